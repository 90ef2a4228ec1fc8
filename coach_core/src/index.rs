//! Inverted index over algorithm result signatures: for every signature
//! position, postings from byte value to the algorithms producing it.
//! Queries pin positions that must match, reward positions that may match,
//! and exclude positions that must not.

use fxhash::FxHashMap;
use log::trace;

pub type AlgId = u32;

pub const SIGNATURE_LEN: usize = 26;

/// Small set of signature byte values (all fit below 32).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharSet(u32);

impl CharSet {
    #[must_use]
    pub fn empty() -> CharSet {
        CharSet(0)
    }

    #[must_use]
    pub fn single(value: u8) -> CharSet {
        CharSet(1 << value)
    }

    pub fn insert(&mut self, value: u8) {
        self.0 |= 1 << value;
    }

    #[must_use]
    pub fn contains(self, value: u8) -> bool {
        self.0 & (1 << value) != 0
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn values(self) -> impl Iterator<Item = u8> {
        (0..32).filter(move |&v| self.contains(v))
    }
}

impl FromIterator<u8> for CharSet {
    fn from_iter<I: IntoIterator<Item = u8>>(iter: I) -> CharSet {
        let mut set = CharSet::empty();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PositionConstraint {
    /// Candidate signatures must carry one of these values here.
    pub must: CharSet,
    /// Matching one of these values adds to the score.
    pub may: CharSet,
    /// Signatures carrying one of these values are dropped.
    pub not: CharSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreBy {
    #[default]
    MustOnly,
    May,
}

#[derive(Debug, Clone, Default)]
pub struct Query {
    pub constraints: FxHashMap<usize, PositionConstraint>,
    pub score_by: ScoreBy,
    pub limit: Option<usize>,
}

const DEFAULT_LIMIT: usize = 100;

impl Query {
    #[must_use]
    pub fn new() -> Query {
        Query::default()
    }

    #[must_use]
    pub fn must(mut self, position: usize, value: u8) -> Query {
        self.constraints.entry(position).or_default().must.insert(value);
        self
    }

    #[must_use]
    pub fn may(mut self, position: usize, value: u8) -> Query {
        self.constraints.entry(position).or_default().may.insert(value);
        self
    }

    #[must_use]
    pub fn not(mut self, position: usize, value: u8) -> Query {
        self.constraints.entry(position).or_default().not.insert(value);
        self
    }

    #[must_use]
    pub fn score_by(mut self, score_by: ScoreBy) -> Query {
        self.score_by = score_by;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Query {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    pub id: AlgId,
    pub score: u32,
}

pub struct AlgIndex {
    postings: Vec<FxHashMap<u8, Vec<AlgId>>>,
    signatures: Vec<[u8; SIGNATURE_LEN]>,
}

impl AlgIndex {
    #[must_use]
    pub fn build(signatures: Vec<[u8; SIGNATURE_LEN]>) -> AlgIndex {
        let mut postings: Vec<FxHashMap<u8, Vec<AlgId>>> =
            vec![FxHashMap::default(); SIGNATURE_LEN];
        for (id, signature) in signatures.iter().enumerate() {
            for (position, &value) in signature.iter().enumerate() {
                postings[position]
                    .entry(value)
                    .or_default()
                    .push(id as AlgId);
            }
        }
        AlgIndex {
            postings,
            signatures,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    #[must_use]
    pub fn signature(&self, id: AlgId) -> &[u8; SIGNATURE_LEN] {
        &self.signatures[id as usize]
    }

    /// Ranked candidate lookup. Must-positions intersect (an empty
    /// intersection short-circuits to no hits), may-positions seed the
    /// candidate set when nothing is pinned, not-positions filter.
    #[must_use]
    pub fn search(&self, query: &Query) -> Vec<Hit> {
        let mut candidates: Option<Vec<AlgId>> = None;
        for (&position, constraint) in &query.constraints {
            if constraint.must.is_empty() {
                continue;
            }
            let mut matching: Vec<AlgId> = constraint
                .must
                .values()
                .filter_map(|value| self.postings[position].get(&value))
                .flatten()
                .copied()
                .collect();
            matching.sort_unstable();
            candidates = Some(match candidates {
                None => matching,
                Some(existing) => intersect_sorted(&existing, &matching),
            });
            if candidates.as_ref().is_some_and(Vec::is_empty) {
                return Vec::new();
            }
        }

        let candidates = candidates.unwrap_or_else(|| {
            let mut seeded: Vec<AlgId> = query
                .constraints
                .iter()
                .flat_map(|(&position, constraint)| {
                    constraint
                        .may
                        .values()
                        .filter_map(move |value| self.postings[position].get(&value))
                        .flatten()
                        .copied()
                })
                .collect();
            seeded.sort_unstable();
            seeded.dedup();
            if seeded.is_empty() && query.constraints.values().all(|c| c.may.is_empty()) {
                (0..self.signatures.len() as AlgId).collect()
            } else {
                seeded
            }
        });
        trace!("{} candidates before filtering", candidates.len());

        let mut hits: Vec<Hit> = candidates
            .into_iter()
            .filter(|&id| {
                query.constraints.iter().all(|(&position, constraint)| {
                    !constraint.not.contains(self.signatures[id as usize][position])
                })
            })
            .map(|id| Hit {
                id,
                score: self.score(id, query),
            })
            .collect();
        hits.sort_unstable_by(|a, b| b.score.cmp(&a.score).then(a.id.cmp(&b.id)));
        hits.truncate(query.limit.unwrap_or(DEFAULT_LIMIT));
        hits
    }

    fn score(&self, id: AlgId, query: &Query) -> u32 {
        let signature = &self.signatures[id as usize];
        let mut score = 0;
        for (&position, constraint) in &query.constraints {
            let value = signature[position];
            if constraint.must.contains(value) {
                score += 100;
            }
            if query.score_by == ScoreBy::May && constraint.may.contains(value) {
                score += 1;
            }
        }
        score
    }
}

fn intersect_sorted(a: &[AlgId], b: &[AlgId]) -> Vec<AlgId> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                if out.last() != Some(&a[i]) {
                    out.push(a[i]);
                }
                i += 1;
                j += 1;
            }
        }
    }
    out
}
