use crate::error::{Error, Result};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

/// Wire gauge. `Gauge::ANY` (written `*`) inherits the gauge of the other end of a connection.
///
/// `PartialEq` is structural (`ANY != 12`); matching connections use
/// [`Gauge::compatible_with`], which lets the wildcard agree with everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Gauge(Option<u32>);

impl Gauge {
    pub const ANY: Gauge = Gauge(None);

    pub const fn new(value: u32) -> Self {
        Self(Some(value))
    }

    pub fn value(self) -> Option<u32> {
        self.0
    }

    pub fn is_any(self) -> bool {
        self.0.is_none()
    }

    /// Left-biased: keeps `self` unless it is the wildcard.
    pub fn coalesce(self, other: Gauge) -> Gauge {
        if self.is_any() { other } else { self }
    }

    pub fn compatible_with(self, other: Gauge) -> bool {
        match (self.0, other.0) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}

impl From<u32> for Gauge {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<Option<u32>> for Gauge {
    fn from(value: Option<u32>) -> Self {
        Self(value)
    }
}

impl BitOr for Gauge {
    type Output = Gauge;

    fn bitor(self, rhs: Gauge) -> Gauge {
        self.coalesce(rhs)
    }
}

impl fmt::Display for Gauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("*"),
        }
    }
}

impl FromStr for Gauge {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s == "*" {
            return Ok(Gauge::ANY);
        }
        s.parse::<u32>()
            .map(Gauge::new)
            .map_err(|_| Error::InvalidGauge {
                literal: s.to_string(),
            })
    }
}

impl Serialize for Gauge {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.0 {
            Some(v) => serializer.serialize_u32(v),
            None => serializer.serialize_str("*"),
        }
    }
}

impl<'de> Deserialize<'de> for Gauge {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct GaugeVisitor;

        impl<'de> Visitor<'de> for GaugeVisitor {
            type Value = Gauge;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer gauge or \"*\"")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Gauge, E> {
                u32::try_from(v)
                    .map(Gauge::new)
                    .map_err(|_| E::custom(format!("gauge {v} out of range")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Gauge, E> {
                u32::try_from(v)
                    .map(Gauge::new)
                    .map_err(|_| E::custom(format!("gauge {v} out of range")))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Gauge, E> {
                if v.fract() == 0.0 && v >= 0.0 && v <= u32::MAX as f64 {
                    Ok(Gauge::new(v as u32))
                } else {
                    Err(E::custom(format!("gauge {v} is not a whole number")))
                }
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Gauge, E> {
                v.parse::<Gauge>().map_err(E::custom)
            }

            fn visit_unit<E: de::Error>(self) -> std::result::Result<Gauge, E> {
                Ok(Gauge::ANY)
            }

            fn visit_none<E: de::Error>(self) -> std::result::Result<Gauge, E> {
                Ok(Gauge::ANY)
            }

            fn visit_some<D: Deserializer<'de>>(
                self,
                deserializer: D,
            ) -> std::result::Result<Gauge, D::Error> {
                deserializer.deserialize_any(self)
            }
        }

        deserializer.deserialize_any(GaugeVisitor)
    }
}

/// Gauge → rendered line width (px).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, f64>",
    into = "BTreeMap<String, f64>"
)]
pub struct GaugeTable {
    widths: BTreeMap<u32, f64>,
}

impl Default for GaugeTable {
    fn default() -> Self {
        Self::from_entries([(12, 15.0), (22, 2.0)])
    }
}

impl GaugeTable {
    pub fn from_entries(entries: impl IntoIterator<Item = (u32, f64)>) -> Self {
        Self {
            widths: entries.into_iter().collect(),
        }
    }

    pub fn insert(&mut self, gauge: u32, width: f64) {
        self.widths.insert(gauge, width);
    }

    /// Rendered width of `gauge`. The wildcard has no width of its own.
    pub fn width(&self, gauge: Gauge) -> Result<f64> {
        gauge
            .value()
            .and_then(|g| self.widths.get(&g).copied())
            .ok_or(Error::UnregisteredGauge { gauge })
    }

    /// CSS length for `stroke-width`, e.g. `15px`.
    pub fn stroke_width_css(&self, gauge: Gauge) -> Result<String> {
        Ok(format!("{}px", self.width(gauge)?))
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.widths.iter().map(|(g, w)| (*g, *w))
    }
}

impl TryFrom<BTreeMap<String, f64>> for GaugeTable {
    type Error = Error;

    fn try_from(raw: BTreeMap<String, f64>) -> Result<Self> {
        let mut widths = BTreeMap::new();
        for (key, width) in raw {
            let gauge = key.parse::<Gauge>()?;
            let Some(value) = gauge.value() else {
                return Err(Error::InvalidGauge { literal: key });
            };
            widths.insert(value, width);
        }
        Ok(Self { widths })
    }
}

impl From<GaugeTable> for BTreeMap<String, f64> {
    fn from(table: GaugeTable) -> Self {
        table
            .widths
            .into_iter()
            .map(|(g, w)| (g.to_string(), w))
            .collect()
    }
}
