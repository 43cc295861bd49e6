use crate::TypeError;
use std::fmt;
use std::str::FromStr;

/// Service category offered by the salon.
///
/// The on-disk spelling (see [`Category::as_wire`]) is the Spanish label used by the
/// appointment document and the CSV export.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Hair,
    Nails,
    Facial,
    HairRemoval,
}

impl Category {
    /// All categories in catalog order.
    pub const ALL: [Category; 4] = [
        Category::Hair,
        Category::Nails,
        Category::Facial,
        Category::HairRemoval,
    ];

    /// Label stored in the appointment document.
    pub fn as_wire(self) -> &'static str {
        match self {
            Category::Hair => "Cabello",
            Category::Nails => "Uñas",
            Category::Facial => "Facial",
            Category::HairRemoval => "Depilación",
        }
    }

    /// Parse a stored label. Matching is exact.
    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_wire() == s)
    }

    /// Services bookable under this category.
    pub fn services(self) -> &'static [&'static str] {
        match self {
            Category::Hair => &[
                "Corte de cabello",
                "Tinte de cabello",
                "Peinado",
                "Tratamiento capilar",
                "Lavado y peinado",
                "Alisado permanente",
                "Extensiones",
                "Mechas",
                "Hidratación profunda",
            ],
            Category::Nails => &["Manicura", "Pedicura", "Acrilicas", "Gel semipermanente"],
            Category::Facial => &["Masaje facial", "Limpieza facial", "Maquillaje"],
            Category::HairRemoval => &[
                "Depilación con cera",
                "Depilación con hilo",
                "Depilación láser",
                "Depilación con azucar",
            ],
        }
    }

    pub fn offers(self, service: &str) -> bool {
        self.services().contains(&service)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl FromStr for Category {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s).ok_or_else(|| TypeError::UnknownCategory(s.to_string()))
    }
}

impl serde::Serialize for Category {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> serde::Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
