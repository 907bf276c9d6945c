//! Name generation for vessels and their crew.

use rand::Rng;

use stardrift_logic::naming;

use crate::components::PersonName;

/// Fill a vessel name template with a random three-digit serial.
pub fn generate_vessel_name(template: &str, rng: &mut impl Rng) -> String {
    naming::format_serial(template, rng.gen_range(0..1000))
}

/// Generate a random crew name.
pub fn generate_person_name(rng: &mut impl Rng) -> PersonName {
    let given = GIVEN_NAMES[rng.gen_range(0..GIVEN_NAMES.len())];
    let family = FAMILY_NAMES[rng.gen_range(0..FAMILY_NAMES.len())];

    PersonName::new(given, family)
}

// Sample name lists - would be loaded from data files in production
static GIVEN_NAMES: &[&str] = &[
    "Anya", "Bram", "Cato", "Dana", "Edris", "Farid", "Gwen", "Hale", "Imre", "Jolan", "Kara",
    "Lior", "Mira", "Nils", "Odile", "Petra", "Quinn", "Renna", "Soren", "Tavi", "Ursa", "Vesna",
    "Wren", "Yara", "Zef",
];

static FAMILY_NAMES: &[&str] = &[
    "Adeyemi", "Brandt", "Calloway", "Demir", "Eriksen", "Fontaine", "Grieve", "Halloran",
    "Ishida", "Jansen", "Kovac", "Lindqvist", "Marek", "Navarro", "Okafor", "Pryce", "Quist",
    "Rahal", "Strand", "Teller", "Ueda", "Varga", "Winslow", "Yun", "Zolotov",
];
