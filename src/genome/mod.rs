//! Genotype representation over named discrete parameter domains.
//!
//! A [`Domain`] maps each parameter name ("slot") to the finite, ordered set
//! of values that slot may take. A [`Genotype`] is one concrete choice per
//! slot. The domain owns all randomized genotype operations — sampling,
//! single-point mutation, and uniform crossover — so every genotype it
//! produces or transforms stays within the legal value sets.
//!
//! Domains are immutable after construction and shared read-only by every
//! individual of a species.

use std::collections::BTreeMap;

use rand::Rng;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Marker trait for gene values.
///
/// Anything cloneable, comparable, and thread-safe qualifies; a blanket
/// impl covers all such types.
pub trait Gene: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static {}

impl<T: Clone + PartialEq + std::fmt::Debug + Send + Sync + 'static> Gene for T {}

/// Errors raised when constructing a [`Domain`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The domain has no slots at all.
    #[error("domain has no slots")]
    Empty,

    /// A slot was declared with an empty choice list.
    #[error("slot `{slot}` has no legal values")]
    EmptyChoices {
        /// Name of the offending slot.
        slot: String,
    },
}

/// Immutable mapping from slot name to its finite set of legal values.
///
/// Slots are kept in a `BTreeMap`, so iteration order is the lexicographic
/// order of slot names — deterministic and stable across runs.
///
/// # Examples
///
/// ```
/// use evolizer::genome::Domain;
///
/// let domain = Domain::builder()
///     .slot("color", ["red", "green", "blue"])
///     .slot("size", ["s", "m", "l"])
///     .build()
///     .unwrap();
///
/// assert_eq!(domain.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Domain<V: Gene> {
    slots: BTreeMap<String, Vec<V>>,
}

/// Builder for [`Domain`]. Obtained via [`Domain::builder`].
#[derive(Debug, Clone)]
pub struct DomainBuilder<V: Gene> {
    slots: BTreeMap<String, Vec<V>>,
}

impl<V: Gene> DomainBuilder<V> {
    /// Declares a slot with its legal values. Redeclaring a slot replaces
    /// its choice list.
    pub fn slot(mut self, name: impl Into<String>, choices: impl IntoIterator<Item = V>) -> Self {
        self.slots.insert(name.into(), choices.into_iter().collect());
        self
    }

    /// Finalizes the domain.
    ///
    /// # Errors
    /// Returns [`DomainError::Empty`] if no slots were declared, or
    /// [`DomainError::EmptyChoices`] if any slot has no legal values.
    pub fn build(self) -> Result<Domain<V>, DomainError> {
        if self.slots.is_empty() {
            return Err(DomainError::Empty);
        }
        for (name, choices) in &self.slots {
            if choices.is_empty() {
                return Err(DomainError::EmptyChoices { slot: name.clone() });
            }
        }
        Ok(Domain { slots: self.slots })
    }
}

impl<V: Gene> Domain<V> {
    /// Starts building a new domain.
    pub fn builder() -> DomainBuilder<V> {
        DomainBuilder {
            slots: BTreeMap::new(),
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if the domain has no slots. Unreachable for built domains,
    /// present for API completeness.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates slot names in lexicographic order.
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    /// The legal values for a slot, or `None` if the slot does not exist.
    pub fn choices(&self, slot: &str) -> Option<&[V]> {
        self.slots.get(slot).map(Vec::as_slice)
    }

    /// Draws a fully random genotype: every slot sampled independently and
    /// uniformly from its choice list.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Genotype<V> {
        let genes = self
            .slots
            .iter()
            .map(|(name, choices)| (name.clone(), uniform_pick(choices, rng).clone()))
            .collect();
        Genotype { genes }
    }

    /// Single-point mutation: one slot chosen uniformly, its value resampled
    /// uniformly from the legal set. All other slots are untouched.
    ///
    /// The resample may draw the value already present; such a no-op
    /// mutation is permitted and counts as unchanged for caching purposes.
    pub fn mutate<R: Rng>(&self, genotype: &mut Genotype<V>, rng: &mut R) {
        let idx = rng.random_range(0..self.slots.len());
        if let Some((name, choices)) = self.slots.iter().nth(idx) {
            genotype
                .genes
                .insert(name.clone(), uniform_pick(choices, rng).clone());
        }
    }

    /// Uniform crossover: for every slot, the child takes the mother's or
    /// the father's value with equal probability. Values are never blended
    /// and never drawn from outside the two parents.
    ///
    /// The child carries every slot of the domain, even when a parent
    /// genotype is missing one (the other parent, or a fresh uniform draw as
    /// a last resort, fills the gap — genotypes built through this domain
    /// always carry every slot, so the fallback is unreachable in practice).
    pub fn crossover<R: Rng>(
        &self,
        mother: &Genotype<V>,
        father: &Genotype<V>,
        rng: &mut R,
    ) -> Genotype<V> {
        let genes = self
            .slots
            .iter()
            .map(|(name, choices)| {
                let (first, second) = if rng.random_bool(0.5) {
                    (mother, father)
                } else {
                    (father, mother)
                };
                let value = first
                    .genes
                    .get(name)
                    .or_else(|| second.genes.get(name))
                    .unwrap_or_else(|| uniform_pick(choices, rng))
                    .clone();
                (name.clone(), value)
            })
            .collect();
        Genotype { genes }
    }

    /// True iff the genotype has exactly this domain's slots and every value
    /// is a member of its slot's legal set.
    pub fn contains(&self, genotype: &Genotype<V>) -> bool {
        genotype.genes.len() == self.slots.len()
            && genotype.genes.iter().all(|(name, value)| {
                self.slots
                    .get(name)
                    .is_some_and(|choices| choices.contains(value))
            })
    }
}

fn uniform_pick<'a, V, R: Rng>(choices: &'a [V], rng: &mut R) -> &'a V {
    &choices[rng.random_range(0..choices.len())]
}

/// One concrete value choice per domain slot.
///
/// Equality is by value, which makes a genotype usable directly as an
/// evaluation-cache key.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Genotype<V: Gene> {
    genes: BTreeMap<String, V>,
}

impl<V: Gene> Genotype<V> {
    /// The chosen value for a slot, or `None` if absent.
    pub fn get(&self, slot: &str) -> Option<&V> {
        self.genes.get(slot)
    }

    /// Number of slots carried.
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// True if no slots are carried.
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Iterates `(slot, value)` pairs in lexicographic slot order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.genes.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates chosen values in lexicographic slot order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.genes.values()
    }
}

impl<V: Gene> FromIterator<(String, V)> for Genotype<V> {
    fn from_iter<T: IntoIterator<Item = (String, V)>>(iter: T) -> Self {
        Genotype {
            genes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn letters() -> Domain<char> {
        Domain::builder()
            .slot("a", ['x', 'y', 'z'])
            .slot("b", ['0', '1'])
            .slot("c", ['m'])
            .build()
            .unwrap()
    }

    #[test]
    fn build_rejects_empty_domain() {
        let result = Domain::<char>::builder().build();
        assert_eq!(result.unwrap_err(), DomainError::Empty);
    }

    #[test]
    fn build_rejects_empty_choices() {
        let result = Domain::builder()
            .slot("a", ['x'])
            .slot("b", Vec::new())
            .build();
        assert_eq!(
            result.unwrap_err(),
            DomainError::EmptyChoices { slot: "b".into() }
        );
    }

    #[test]
    fn sample_covers_every_slot_within_domain() {
        let domain = letters();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let genotype = domain.sample(&mut rng);
            assert_eq!(genotype.len(), 3);
            assert!(domain.contains(&genotype));
        }
    }

    #[test]
    fn mutate_changes_at_most_one_slot() {
        let domain = letters();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let before = domain.sample(&mut rng);
            let mut after = before.clone();
            domain.mutate(&mut after, &mut rng);
            assert!(domain.contains(&after));
            let changed = before
                .iter()
                .filter(|(slot, value)| after.get(slot) != Some(value))
                .count();
            assert!(changed <= 1, "mutation touched {changed} slots");
        }
    }

    #[test]
    fn crossover_takes_each_gene_from_a_parent() {
        let domain = letters();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let mother = domain.sample(&mut rng);
            let father = domain.sample(&mut rng);
            let child = domain.crossover(&mother, &father, &mut rng);
            assert!(domain.contains(&child));
            for (slot, value) in child.iter() {
                assert!(
                    mother.get(slot) == Some(value) || father.get(slot) == Some(value),
                    "slot {slot} holds a value from neither parent"
                );
            }
        }
    }

    #[test]
    fn crossover_mixes_both_parents() {
        // With 32 two-way slots, inheriting everything from one parent has
        // probability 2^-31 per trial; seeing a mix is statistically certain.
        let mut builder = Domain::builder();
        for i in 0..32 {
            builder = builder.slot(format!("s{i:02}"), [0u8, 1u8]);
        }
        let domain = builder.build().unwrap();
        let mother: Genotype<u8> = domain
            .slots()
            .map(|s| (s.to_string(), 0u8))
            .collect();
        let father: Genotype<u8> = domain
            .slots()
            .map(|s| (s.to_string(), 1u8))
            .collect();

        let mut rng = StdRng::seed_from_u64(42);
        let child = domain.crossover(&mother, &father, &mut rng);
        let maternal = child.values().filter(|&&v| v == 0).count();
        assert!(maternal > 0 && maternal < 32, "no mixing: {maternal}/32");
    }

    #[test]
    fn contains_rejects_foreign_values_and_key_mismatch() {
        let domain = letters();
        let foreign: Genotype<char> = [
            ("a".to_string(), 'q'),
            ("b".to_string(), '0'),
            ("c".to_string(), 'm'),
        ]
        .into_iter()
        .collect();
        assert!(!domain.contains(&foreign));

        let missing: Genotype<char> = [("a".to_string(), 'x')].into_iter().collect();
        assert!(!domain.contains(&missing));
    }

    #[test]
    fn genotype_equality_is_by_value() {
        let domain = letters();
        let mut rng = StdRng::seed_from_u64(7);
        let one = domain.sample(&mut rng);
        let two = one.clone();
        assert_eq!(one, two);
    }
}
