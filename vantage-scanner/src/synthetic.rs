//! Plausible throwaway values for form filling.
//!
//! The interaction engine never submits real data; these generators
//! exist so that filled fields pass superficial client-side validation
//! (an email looks like an email, a password has mixed classes).

use rand::Rng;

const FIRST_NAMES: [&str; 8] = [
    "Ada", "Grace", "Alan", "Edsger", "Barbara", "Donald", "Margaret", "Dennis",
];

const LAST_NAMES: [&str; 8] = [
    "Lovelace", "Hopper", "Turing", "Dijkstra", "Liskov", "Knuth", "Hamilton", "Ritchie",
];

const STREETS: [&str; 6] = [
    "Park Avenue",
    "Cedar Lane",
    "Mill Road",
    "Harbor Street",
    "Oak Crescent",
    "Station Way",
];

const WORDS: [&str; 10] = [
    "quick", "amber", "signal", "harbor", "velvet", "copper", "meadow", "lantern", "drift",
    "summit",
];

fn pick<'a>(items: &'a [&'a str]) -> &'a str {
    let mut rng = rand::rng();
    items[rng.random_range(0..items.len())]
}

pub fn full_name() -> String {
    format!("{} {}", pick(&FIRST_NAMES), pick(&LAST_NAMES))
}

pub fn email() -> String {
    let mut rng = rand::rng();
    format!(
        "{}.{}{}@example.com",
        pick(&FIRST_NAMES).to_lowercase(),
        pick(&LAST_NAMES).to_lowercase(),
        rng.random_range(10..100)
    )
}

pub fn password() -> String {
    let mut rng = rand::rng();
    format!(
        "{}{}{}!{}",
        pick(&WORDS),
        pick(&WORDS).to_uppercase(),
        rng.random_range(10..100),
        rng.random_range(0..10)
    )
}

pub fn phone() -> String {
    let mut rng = rand::rng();
    format!(
        "+1-555-{:03}-{:04}",
        rng.random_range(100..1000),
        rng.random_range(0..10000)
    )
}

pub fn integer(min: i64, max: i64) -> i64 {
    rand::rng().random_range(min..=max)
}

pub fn street_address() -> String {
    format!("{} {}", integer(1, 999), pick(&STREETS))
}

pub fn sentence() -> String {
    format!("{} {} {}", pick(&WORDS), pick(&WORDS), pick(&WORDS))
}
