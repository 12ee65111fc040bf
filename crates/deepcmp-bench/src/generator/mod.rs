//! Population generator.
//!
//! Produces [`Population`] graphs of nested objects and unordered
//! collections. Every pet points back at its owner, so each person sits on a
//! reference cycle; friend links only point at earlier people and share
//! subgraphs without adding cycles.

pub mod mutate;
pub mod people;

use deepcmp_core::Value;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Configuration for the population generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Seed for the random number generator (deterministic).
    pub seed: u64,
    /// Number of people.
    pub num_people: usize,
    /// Maximum pets per person.
    pub max_pets: usize,
    /// Maximum tags per person.
    pub max_tags: usize,
    /// Number of distinct cities addresses are drawn from.
    pub num_cities: usize,
    /// Fraction of people whose `friend` points at an earlier person (0.0-1.0).
    pub friend_density: f64,
}

/// Predefined size tiers for benchmarking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeTier {
    /// 20 people
    Small,
    /// 200 people
    Medium,
    /// 1000 people
    Large,
}

impl SizeTier {
    /// Returns the default `GeneratorConfig` for this size tier.
    pub fn config(self, seed: u64) -> GeneratorConfig {
        match self {
            SizeTier::Small => GeneratorConfig {
                seed,
                num_people: 20,
                max_pets: 2,
                max_tags: 3,
                num_cities: 5,
                friend_density: 0.3,
            },
            SizeTier::Medium => GeneratorConfig {
                seed,
                num_people: 200,
                max_pets: 3,
                max_tags: 4,
                num_cities: 20,
                friend_density: 0.4,
            },
            SizeTier::Large => GeneratorConfig {
                seed,
                num_people: 1000,
                max_pets: 3,
                max_tags: 5,
                num_cities: 50,
                friend_density: 0.5,
            },
        }
    }
}

/// A generated set of people.
///
/// Pet owners form reference cycles. Dropping the population clears them so
/// the reference-counted graph is released.
#[derive(Debug)]
pub struct Population {
    people: Vec<Value>,
}

impl Population {
    /// The generated people, in generation order.
    pub fn people(&self) -> &[Value] {
        &self.people
    }

    /// Number of people.
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// Returns `true` if no people were generated.
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// The people as an ordered list.
    pub fn as_list(&self) -> Value {
        Value::list(self.people.iter().cloned())
    }

    /// The people as an unordered set.
    pub fn as_set(&self) -> Value {
        Value::set(self.people.iter().cloned())
    }

    /// The people as an unordered collection compared pairwise.
    pub fn as_bag(&self) -> Value {
        Value::bag(self.people.iter().cloned())
    }

    /// The people as a set in reverse generation order.
    pub fn as_reversed_set(&self) -> Value {
        Value::set(self.people.iter().rev().cloned())
    }

    /// Number of people whose `friend` field is set.
    pub fn friend_links(&self) -> usize {
        self.people
            .iter()
            .filter_map(Value::as_object)
            .filter(|o| o.get("friend").is_some_and(|f| !f.is_null()))
            .count()
    }
}

impl Drop for Population {
    fn drop(&mut self) {
        for person in &self.people {
            let Some(pets) = person.as_object().and_then(|o| o.get("pets")) else {
                continue;
            };
            for pet in pets.as_seq().map(|s| s.items()).unwrap_or_default() {
                pet.set_field("owner", Value::Null);
            }
        }
    }
}

/// Generates a population from the given configuration.
///
/// All randomness is deterministic, seeded from `config.seed`: two calls
/// with the same configuration yield structurally equal but independent
/// graphs.
pub fn generate_population(config: &GeneratorConfig) -> Population {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let people: Vec<Value> = (0..config.num_people)
        .map(|i| people::person(i, config, &mut rng))
        .collect();

    let density = config.friend_density.clamp(0.0, 1.0);
    for (i, person) in people.iter().enumerate().skip(1) {
        if rng.gen_bool(density) {
            let friend = &people[rng.gen_range(0..i)];
            person.set_field("friend", friend.clone());
        }
    }

    Population { people }
}
