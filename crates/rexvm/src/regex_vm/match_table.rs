// Capture table filled in while the interpreter runs.
//
// Each slot holds (start, length) pairs and a live count; the last live
// pair is the group's current value. Balancing groups append pairs whose
// words are negative: a word `w < 0` points at word `-3 - w` of the same
// slot, so a popped capture can be undone by dropping the pointer pair
// when the interpreter backtracks. `tidy` squeezes the pointers out once
// the match is final.

#[derive(Debug, Clone, Default)]
pub struct MatchTable {
    matches: Vec<Vec<i32>>,
    counts: Vec<usize>,
    balancing: bool,
}

impl MatchTable {
    pub fn new(slots: usize) -> Self {
        let mut table = Self::default();
        table.reset(slots);
        table
    }

    /// Clears every slot, keeping allocations.
    pub fn reset(&mut self, slots: usize) {
        if self.matches.len() != slots {
            self.matches.resize_with(slots, || vec![0; 2]);
        }
        self.counts.clear();
        self.counts.resize(slots, 0);
        self.balancing = false;
    }

    pub fn slot_count(&self) -> usize {
        self.counts.len()
    }

    pub fn add_match(&mut self, slot: usize, start: i32, len: i32) {
        let count = self.counts[slot];
        let words = &mut self.matches[slot];
        if words.len() < count * 2 + 2 {
            let grown = (words.len() * 2).max(count * 2 + 2);
            words.resize(grown, 0);
        }
        words[count * 2] = start;
        words[count * 2 + 1] = len;
        self.counts[slot] = count + 1;
    }

    /// Pops the current capture of `slot` by pushing a pointer pair to the
    /// one below it.
    pub fn balance_match(&mut self, slot: usize) {
        self.balancing = true;

        let words = &self.matches[slot];
        let mut target = self.counts[slot] as i32 * 2 - 2;
        if words[target as usize] < 0 {
            target = -3 - words[target as usize];
        }
        target -= 2;

        if target >= 0 && words[target as usize] < 0 {
            let (a, b) = (words[target as usize], words[target as usize + 1]);
            self.add_match(slot, a, b);
        } else {
            self.add_match(slot, -3 - target, -4 - target);
        }
    }

    /// Drops the newest pair of `slot`.
    pub fn remove_match(&mut self, slot: usize) {
        self.counts[slot] -= 1;
    }

    /// The group has a current, non-popped capture.
    pub fn is_matched(&self, slot: usize) -> bool {
        let Some(&count) = self.counts.get(slot) else {
            return false;
        };
        count > 0 && self.matches[slot][count * 2 - 1] != -3 + 1
    }

    pub fn match_index(&self, slot: usize) -> i32 {
        let words = &self.matches[slot];
        let i = words[self.counts[slot] * 2 - 2];
        if i >= 0 { i } else { words[(-3 - i) as usize] }
    }

    pub fn match_length(&self, slot: usize) -> i32 {
        let words = &self.matches[slot];
        let i = words[self.counts[slot] * 2 - 1];
        if i >= 0 { i } else { words[(-3 - i) as usize] }
    }

    pub fn count(&self, slot: usize) -> usize {
        self.counts[slot]
    }

    /// Removes balancing pointers together with the captures they popped.
    pub fn tidy(&mut self) {
        if !self.balancing {
            return;
        }
        for (words, count) in self.matches.iter_mut().zip(self.counts.iter_mut()) {
            let limit = *count * 2;
            let mut i = words[..limit].iter().position(|&w| w < 0).unwrap_or(limit);
            let mut j = i;
            while i < limit {
                if words[i] < 0 {
                    j -= 1;
                } else {
                    words[j] = words[i];
                    j += 1;
                }
                i += 1;
            }
            *count = j / 2;
        }
        self.balancing = false;
    }

    /// Live (start, length) pairs of a slot, oldest first.
    pub fn captures(&self, slot: usize) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.matches[slot][..self.counts[slot] * 2]
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_current() {
        let mut t = MatchTable::new(2);
        assert!(!t.is_matched(1));
        t.add_match(1, 3, 2);
        t.add_match(1, 7, 1);
        assert!(t.is_matched(1));
        assert_eq!((t.match_index(1), t.match_length(1)), (7, 1));
        t.remove_match(1);
        assert_eq!((t.match_index(1), t.match_length(1)), (3, 2));
        assert!(!t.is_matched(5));
    }

    #[test]
    fn test_balance_pops_and_undoes() {
        let mut t = MatchTable::new(1);
        t.add_match(0, 0, 1);
        t.add_match(0, 4, 1);
        t.balance_match(0);
        // the pointer pair exposes the capture below the popped one
        assert_eq!((t.match_index(0), t.match_length(0)), (0, 1));
        t.balance_match(0);
        assert!(!t.is_matched(0));

        // undo the last pop
        t.remove_match(0);
        assert_eq!(t.match_index(0), 0);
    }

    #[test]
    fn test_tidy_removes_popped_pairs() {
        let mut t = MatchTable::new(1);
        t.add_match(0, 0, 1);
        t.add_match(0, 4, 1);
        t.balance_match(0);
        t.tidy();
        assert_eq!(t.count(0), 1);
        assert_eq!(t.captures(0).collect::<Vec<_>>(), vec![(0, 1)]);

        let mut t = MatchTable::new(1);
        t.add_match(0, 2, 1);
        t.balance_match(0);
        t.tidy();
        assert_eq!(t.count(0), 0);
    }

    #[test]
    fn test_reset_keeps_slot_count() {
        let mut t = MatchTable::new(3);
        t.add_match(2, 1, 1);
        t.reset(3);
        assert_eq!(t.count(2), 0);
        assert_eq!(t.slot_count(), 3);
    }
}
