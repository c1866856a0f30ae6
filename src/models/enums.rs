use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

// Stored codes match the legacy registry exports, so existing patient
// data imports without translation.

str_enum!(IdType {
    CitizenshipCard => "CC",
    IdentityCard => "TI",
    ForeignerCard => "CE",
    Passport => "PA",
});

str_enum!(MaritalStatus {
    Single => "SOLTERO",
    Married => "CASADO",
    Divorced => "DIVORCIADO",
    Widowed => "VIUDO",
    FreeUnion => "UNION_LIBRE",
});

str_enum!(Sex {
    Male => "M",
    Female => "F",
    Other => "O",
});

str_enum!(FinalDiagnosis {
    ColorectalCancer => "CCR",
    Control => "CO",
});

impl FinalDiagnosis {
    /// Human-readable classification label
    pub fn label(&self) -> &'static str {
        match self {
            Self::ColorectalCancer => "Colorectal Cancer",
            Self::Control => "Control",
        }
    }
}

str_enum!(ResourceKind {
    Book => "LIBRO",
    Article => "ARTICULO",
    Video => "VIDEO",
});
