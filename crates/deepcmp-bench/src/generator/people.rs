//! Classes and builders for generated people.

use std::sync::{Arc, LazyLock};

use deepcmp_core::{Class, Value};
use rand::Rng;
use rand::rngs::StdRng;

use super::GeneratorConfig;

const FIRST_NAMES: &[&str] = &[
    "Ada", "Bruno", "Chiara", "Dmitri", "Elena", "Farid", "Greta", "Hiro", "Ines", "Jonas",
];

const SPECIES: &[&str] = &["cat", "dog", "parrot", "rabbit", "turtle"];

const TAGS: &[&str] = &[
    "admin", "beta", "billing", "support", "trial", "vip", "legacy", "partner",
];

static ADDRESS: LazyLock<Arc<Class>> = LazyLock::new(|| {
    Class::builder("bench.Address")
        .fields(["street", "city", "zip"])
        .build()
});

static PET: LazyLock<Arc<Class>> = LazyLock::new(|| {
    Class::builder("bench.Pet")
        .fields(["name", "species", "owner"])
        .build()
});

static PERSON: LazyLock<Arc<Class>> = LazyLock::new(|| {
    Class::builder("bench.Person")
        .fields(["id", "name", "age", "address", "pets", "tags", "friend"])
        .build()
});

/// `bench.Address { street, city, zip }`.
pub fn address_class() -> &'static Arc<Class> {
    &ADDRESS
}

/// `bench.Pet { name, species, owner }`.
pub fn pet_class() -> &'static Arc<Class> {
    &PET
}

/// `bench.Person { id, name, age, address, pets, tags, friend }`.
pub fn person_class() -> &'static Arc<Class> {
    &PERSON
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

/// Builds person number `index` with an address, tags and pets that point
/// back at the person. The friend link is left null.
pub fn person(index: usize, config: &GeneratorConfig, rng: &mut StdRng) -> Value {
    let name = format!("{} {index}", pick(rng, FIRST_NAMES));
    let city = rng.gen_range(0..config.num_cities.max(1));
    let address = Value::object(
        &ADDRESS,
        [
            (
                "street",
                Value::from(format!("{} Main St", rng.gen_range(1..500))),
            ),
            ("city", Value::from(format!("City {city}"))),
            ("zip", Value::from(format!("{:05}", 10_000 + city * 7))),
        ],
    );

    let pets = (0..rng.gen_range(0..=config.max_pets))
        .map(|p| {
            Value::object(
                &PET,
                [
                    ("name", Value::from(format!("pet-{index}-{p}"))),
                    ("species", Value::from(pick(rng, SPECIES))),
                ],
            )
        })
        .collect::<Vec<_>>();

    let tags = (0..rng.gen_range(0..=config.max_tags))
        .map(|_| Value::from(pick(rng, TAGS)))
        .collect::<Vec<_>>();

    let id = i64::try_from(index).unwrap_or(i64::MAX);
    let person = Value::object(
        &PERSON,
        [
            ("id", Value::from(id)),
            ("name", Value::from(name)),
            ("age", Value::from(rng.gen_range(18i64..90))),
            ("address", address),
            ("pets", Value::list(pets.iter().cloned())),
            ("tags", Value::set(tags)),
        ],
    );
    for pet in &pets {
        pet.set_field("owner", person.clone());
    }
    person
}
