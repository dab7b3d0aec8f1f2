//! Best-ordering search over a small set of items.
//!
//! The search enumerates orderings in lexicographic order of the input positions, so the input
//! order itself is always the first candidate and ties keep the earliest candidate (a later
//! ordering has to score strictly higher to replace the current best).
//!
//! Enumeration is exhaustive and therefore factorial. Above [`DEFAULT_MAX_EXHAUSTIVE`] items the
//! search switches to adjacent-swap hill climbing over the same scoring function, which keeps
//! the `(items, score, good_enough) -> ordering` contract but gives up optimality.

/// 8! = 40320 candidates, the largest set that is still instant to enumerate.
pub const DEFAULT_MAX_EXHAUSTIVE: usize = 8;

const DEFAULT_MAX_LOCAL_PASSES: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Every ordering was scored.
    Exhausted,
    /// A candidate reached the `good_enough` threshold and the search stopped there.
    GoodEnough,
    /// Too many items for enumeration; the result is a local optimum.
    LocalSearch,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome<T, S> {
    pub order: Vec<T>,
    /// Score of `order`. `None` only when the scoring function never produced a comparable value.
    pub score: Option<S>,
    /// Number of scoring-function invocations.
    pub evaluated: usize,
    pub status: SearchStatus,
}

#[derive(Debug, Clone, Copy)]
pub struct PermutationSearch<S> {
    good_enough: Option<S>,
    max_exhaustive: usize,
    max_local_passes: usize,
}

impl<S> Default for PermutationSearch<S> {
    fn default() -> Self {
        Self {
            good_enough: None,
            max_exhaustive: DEFAULT_MAX_EXHAUSTIVE,
            max_local_passes: DEFAULT_MAX_LOCAL_PASSES,
        }
    }
}

impl<S> PermutationSearch<S>
where
    S: PartialOrd + Copy,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop as soon as a candidate scores at least `score`.
    pub fn good_enough(mut self, score: S) -> Self {
        self.good_enough = Some(score);
        self
    }

    pub fn max_exhaustive(mut self, items: usize) -> Self {
        self.max_exhaustive = items;
        self
    }

    pub fn max_local_passes(mut self, passes: usize) -> Self {
        self.max_local_passes = passes.max(1);
        self
    }

    pub fn run<T: Clone>(
        &self,
        items: &[T],
        mut score: impl FnMut(&[T]) -> S,
    ) -> SearchOutcome<T, S> {
        if items.len() > self.max_exhaustive {
            return self.run_local(items, &mut score);
        }

        let mut indices: Vec<usize> = (0..items.len()).collect();
        let mut candidate: Vec<T> = items.to_vec();
        let mut best: Option<(Vec<usize>, S)> = None;
        let mut evaluated = 0usize;

        loop {
            fill(&mut candidate, items, &indices);
            let s = score(&candidate);
            evaluated += 1;

            let improves = match &best {
                // Incomparable scores (NaN) never become the best candidate.
                None => s.partial_cmp(&s).is_some(),
                Some((_, best_score)) => s > *best_score,
            };
            if improves {
                best = Some((indices.clone(), s));
                if self.reached(s) {
                    return SearchOutcome {
                        order: candidate,
                        score: Some(s),
                        evaluated,
                        status: SearchStatus::GoodEnough,
                    };
                }
            }

            if !next_permutation(&mut indices) {
                break;
            }
        }

        let (order, score) = match best {
            Some((indices, s)) => (indices.iter().map(|&i| items[i].clone()).collect(), Some(s)),
            None => (items.to_vec(), None),
        };
        SearchOutcome {
            order,
            score,
            evaluated,
            status: SearchStatus::Exhausted,
        }
    }

    fn run_local<T: Clone>(
        &self,
        items: &[T],
        score: &mut impl FnMut(&[T]) -> S,
    ) -> SearchOutcome<T, S> {
        let mut order: Vec<T> = items.to_vec();
        let mut best = score(&order);
        let mut evaluated = 1usize;
        if self.reached(best) {
            return SearchOutcome {
                order,
                score: Some(best),
                evaluated,
                status: SearchStatus::GoodEnough,
            };
        }

        for _ in 0..self.max_local_passes {
            let mut improved = false;
            for i in 0..order.len().saturating_sub(1) {
                order.swap(i, i + 1);
                let s = score(&order);
                evaluated += 1;
                if s > best {
                    best = s;
                    improved = true;
                    if self.reached(best) {
                        return SearchOutcome {
                            order,
                            score: Some(best),
                            evaluated,
                            status: SearchStatus::GoodEnough,
                        };
                    }
                } else {
                    order.swap(i, i + 1);
                }
            }
            if !improved {
                break;
            }
        }

        SearchOutcome {
            order,
            score: Some(best),
            evaluated,
            status: SearchStatus::LocalSearch,
        }
    }

    fn reached(&self, s: S) -> bool {
        self.good_enough.is_some_and(|g| s >= g)
    }
}

/// Highest-scoring ordering of `items`; see the module docs for tie-breaking and limits.
pub fn find_best_permutation<T, S>(
    items: &[T],
    score: impl FnMut(&[T]) -> S,
    good_enough: Option<S>,
) -> Vec<T>
where
    T: Clone,
    S: PartialOrd + Copy,
{
    let mut search = PermutationSearch::new();
    if let Some(g) = good_enough {
        search = search.good_enough(g);
    }
    search.run(items, score).order
}

fn fill<T: Clone>(candidate: &mut [T], items: &[T], indices: &[usize]) {
    for (slot, &i) in candidate.iter_mut().zip(indices) {
        *slot = items[i].clone();
    }
}

/// Advances `a` to the next lexicographic permutation; `false` once `a` is the last one.
fn next_permutation(a: &mut [usize]) -> bool {
    if a.len() < 2 {
        return false;
    }
    let mut i = a.len() - 1;
    while i > 0 && a[i - 1] >= a[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = a.len() - 1;
    while a[j] <= a[i - 1] {
        j -= 1;
    }
    a.swap(i - 1, j);
    a[i..].reverse();
    true
}
