// Test module organization
pub mod test_captures;
pub mod test_char_class;
pub mod test_matching;
pub mod test_options;
pub mod test_parser;
pub mod test_split;
pub mod test_timeout;
