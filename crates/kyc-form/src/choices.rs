//! # Choice Sets
//!
//! Closed option sets for the select fields of both forms. Each set is one
//! enum; its `OPTIONS` table is what the field schema validates against and
//! what the typed record parses into, so the two can never drift apart.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use kyc_core::KycError;

macro_rules! choice_set {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $value)] $variant, )+
        }

        impl $name {
            /// Wire values in display order.
            pub const OPTIONS: &'static [&'static str] = &[$($value),+];

            /// The wire value of this option.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $value, )+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = KycError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $value => Ok(Self::$variant), )+
                    other => Err(KycError::Parse(format!(
                        concat!("unknown ", stringify!($name), " option: {:?}"),
                        other
                    ))),
                }
            }
        }
    };
}

// ─── Individual ──────────────────────────────────────────────────────

choice_set! {
    /// Gender as declared on the personal details tab.
    pub enum Gender {
        Male => "male",
        Female => "female",
        Other => "other",
        PreferNotToSay => "prefer_not_to_say",
    }
}

choice_set! {
    /// Kind of government-issued identity document.
    pub enum IdType {
        Passport => "passport",
        NationalId => "national_id",
        DriversLicense => "drivers_license",
    }
}

choice_set! {
    /// Annual income band (USD equivalent).
    pub enum IncomeBand {
        Under25k => "under_25k",
        From25kTo50k => "25k_50k",
        From50kTo100k => "50k_100k",
        From100kTo250k => "100k_250k",
        Over250k => "over_250k",
    }
}

choice_set! {
    /// Primary source of an individual's funds.
    pub enum PersonalFundsSource {
        Employment => "employment",
        Business => "business",
        Investments => "investments",
        Inheritance => "inheritance",
        Savings => "savings",
        Other => "other",
    }
}

choice_set! {
    /// FATCA self-declaration for individuals.
    pub enum FatcaStatus {
        UsPerson => "us_person",
        NonUsPerson => "non_us_person",
    }
}

// ─── Entity ──────────────────────────────────────────────────────────

choice_set! {
    /// Legal form of an entity.
    pub enum EntityType {
        Corporation => "corporation",
        Llc => "llc",
        Partnership => "partnership",
        Trust => "trust",
        Foundation => "foundation",
        SoleProprietorship => "sole_proprietorship",
    }
}

choice_set! {
    /// Annual revenue band (USD equivalent).
    pub enum RevenueBand {
        Under1m => "under_1m",
        From1mTo10m => "1m_10m",
        From10mTo50m => "10m_50m",
        From50mTo100m => "50m_100m",
        Over100m => "over_100m",
    }
}

choice_set! {
    /// Headcount band.
    pub enum HeadcountBand {
        From1To10 => "1_10",
        From11To50 => "11_50",
        From51To200 => "51_200",
        From201To1000 => "201_1000",
        Over1000 => "over_1000",
    }
}

choice_set! {
    /// Primary source of an entity's funds.
    pub enum EntityFundsSource {
        OperatingRevenue => "operating_revenue",
        Investment => "investment",
        Loans => "loans",
        CapitalContribution => "capital_contribution",
        Other => "other",
    }
}

choice_set! {
    /// FATCA classification for entities.
    pub enum FatcaClassification {
        ActiveNffe => "active_nffe",
        PassiveNffe => "passive_nffe",
        FinancialInstitution => "financial_institution",
        Exempt => "exempt",
    }
}
