use crate::db::StoreError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = StoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(StoreError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(Gender {
    Male => "Male",
    Female => "Female",
    Other => "Other",
});

impl Gender {
    /// Case-insensitive parse of user input ("female", " MALE ").
    pub fn from_input(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.as_str().eq_ignore_ascii_case(trimmed))
    }
}

str_enum!(
    /// Canonical disease keys known to the advice table.
    Disease {
        Fever => "fever",
        Cold => "cold",
        Cough => "cough",
        Headache => "headache",
        Diabetes => "diabetes",
        Hypertension => "hypertension",
        Asthma => "asthma",
        Malaria => "malaria",
        Typhoid => "typhoid",
        Allergy => "allergy",
        Migraine => "migraine",
        Cholera => "cholera",
        Covid => "covid",
        Tuberculosis => "tuberculosis",
        Stomachache => "stomachache",
        Acidity => "acidity",
        LooseMotion => "loose motion",
        Constipation => "constipation",
        SkinInfection => "skin infection",
        ThroatPain => "throat pain",
        PeriodPain => "period pain",
        Vomiting => "vomiting",
        BackPain => "back pain",
    }
);

str_enum!(
    /// Subtypes of [`Disease::SkinInfection`].
    SkinSubtype {
        Fungal => "fungal",
        Bacterial => "bacterial",
        Viral => "viral",
        Allergic => "allergic",
    }
);
