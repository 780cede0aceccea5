//! Deterministic enumeration of two-team partitions
//!
//! Index 0 is pinned to team one, so a partition and its mirror image are
//! produced exactly once. The remaining team-one slots walk the combinations of
//! indices `1..pool_size` in lexicographic order.

/// Team membership by pool index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub team1: Vec<usize>,
    pub team2: Vec<usize>,
}

/// Iterator over the distinct partitions of `2 * team_size` indices
#[derive(Debug, Clone)]
pub struct Partitions {
    pool_size: usize,
    /// Team-one indices other than 0, strictly increasing
    chosen: Vec<usize>,
    done: bool,
}

impl Partitions {
    pub fn new(team_size: usize) -> Self {
        let pool_size = team_size * 2;
        Self {
            pool_size,
            chosen: (1..team_size).collect(),
            done: team_size == 0,
        }
    }

    fn current(&self) -> Partition {
        let mut team1 = Vec::with_capacity(self.chosen.len() + 1);
        team1.push(0);
        team1.extend_from_slice(&self.chosen);

        let team2 = (1..self.pool_size)
            .filter(|i| !self.chosen.contains(i))
            .collect();

        Partition { team1, team2 }
    }

    /// Move `chosen` to the next combination; false once exhausted
    fn advance(&mut self) -> bool {
        let k = self.chosen.len();
        // Largest value position i may hold is pool_size - k + i
        for i in (0..k).rev() {
            if self.chosen[i] < self.pool_size - k + i {
                self.chosen[i] += 1;
                for j in i + 1..k {
                    self.chosen[j] = self.chosen[j - 1] + 1;
                }
                return true;
            }
        }
        false
    }
}

impl Iterator for Partitions {
    type Item = Partition;

    fn next(&mut self) -> Option<Partition> {
        if self.done {
            return None;
        }
        let partition = self.current();
        if !self.advance() {
            self.done = true;
        }
        Some(partition)
    }
}
