//! Resource catalog types.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identifier of a discrete scheduling period (e.g. hour of day).
pub type Slot = u32;

/// Declarative availability rule attached to a [`Resource`].
///
/// Rules are plain data so that a catalog can be stored and reloaded
/// without embedding executable logic.
///
/// # Examples
///
/// ```
/// use u_gridalloc::allocation::Availability;
///
/// let daylight = Availability::window(6, 18);
/// assert!(daylight.is_available(12));
/// assert!(!daylight.is_available(20));
///
/// // first > last wraps around midnight
/// let overnight = Availability::window(22, 4);
/// assert!(overnight.is_available(23));
/// assert!(overnight.is_available(2));
/// assert!(!overnight.is_available(12));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Availability {
    /// Available in every slot.
    #[default]
    Always,

    /// Available in the inclusive range `first..=last`.
    ///
    /// When `first > last` the window wraps: `slot >= first || slot <= last`.
    Window {
        /// First slot of the window.
        first: Slot,
        /// Last slot of the window (inclusive).
        last: Slot,
    },

    /// Available only in the listed slots.
    Slots(Vec<Slot>),
}

impl Availability {
    /// Inclusive slot window.
    pub fn window(first: Slot, last: Slot) -> Self {
        Availability::Window { first, last }
    }

    /// Returns `true` if the rule admits `slot`.
    pub fn is_available(&self, slot: Slot) -> bool {
        match self {
            Availability::Always => true,
            Availability::Window { first, last } if first <= last => {
                (*first..=*last).contains(&slot)
            }
            Availability::Window { first, last } => slot >= *first || slot <= *last,
            Availability::Slots(slots) => slots.contains(&slot),
        }
    }
}

/// A named supply type.
///
/// # Examples
///
/// ```
/// use u_gridalloc::allocation::{Availability, Resource};
///
/// let diesel = Resource::new("Diesel", 60, 3.0)
///     .with_availability(Availability::window(17, 23))
///     .discouraged();
/// assert!(diesel.is_discouraged());
/// assert!(diesel.is_available(18));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Resource {
    /// Unique name within the catalog.
    pub name: String,

    /// Maximum integral units suppliable in one slot.
    pub capacity: u32,

    /// Cost per unit. Must be finite and non-negative.
    pub unit_cost: f64,

    /// Slots in which the resource can be drawn from.
    #[cfg_attr(feature = "serde", serde(default))]
    pub availability: Availability,

    /// Using any unit of a discouraged resource adds a flat penalty.
    #[cfg_attr(feature = "serde", serde(default))]
    pub discouraged: bool,
}

impl Resource {
    /// Creates an always-available, non-discouraged resource.
    pub fn new(name: impl Into<String>, capacity: u32, unit_cost: f64) -> Self {
        Self {
            name: name.into(),
            capacity,
            unit_cost,
            availability: Availability::Always,
            discouraged: false,
        }
    }

    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    /// Marks the resource as discouraged.
    pub fn discouraged(mut self) -> Self {
        self.discouraged = true;
        self
    }

    pub fn is_discouraged(&self) -> bool {
        self.discouraged
    }

    pub fn is_available(&self, slot: Slot) -> bool {
        self.availability.is_available(slot)
    }
}

/// Immutable set of resources, in declaration order.
///
/// A catalog is shared read-only by every evaluation; it carries no
/// interior mutability and can be sent across threads freely.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Catalog {
    resources: Vec<Resource>,
}

impl Catalog {
    pub fn new(resources: Vec<Resource>) -> Self {
        Self { resources }
    }

    /// Appends a resource.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Looks up a resource by name.
    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Resources available in `slot`, in declaration order.
    pub fn available_in(&self, slot: Slot) -> impl Iterator<Item = &Resource> {
        self.resources.iter().filter(move |r| r.is_available(slot))
    }

    /// Validates the catalog.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = HashSet::with_capacity(self.resources.len());
        for resource in &self.resources {
            if resource.name.trim().is_empty() {
                return Err("resource name must not be empty".into());
            }
            if !seen.insert(resource.name.as_str()) {
                return Err(format!("duplicate resource name: {}", resource.name));
            }
            if !resource.unit_cost.is_finite() || resource.unit_cost < 0.0 {
                return Err(format!(
                    "unit_cost of {} must be finite and non-negative, got {}",
                    resource.name, resource.unit_cost
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_inclusive() {
        let rule = Availability::window(6, 18);
        assert!(rule.is_available(6));
        assert!(rule.is_available(18));
        assert!(!rule.is_available(5));
        assert!(!rule.is_available(19));
    }

    #[test]
    fn test_window_wraps() {
        let rule = Availability::window(22, 4);
        assert!(rule.is_available(22));
        assert!(rule.is_available(0));
        assert!(rule.is_available(4));
        assert!(!rule.is_available(5));
        assert!(!rule.is_available(21));
    }

    #[test]
    fn test_slot_list() {
        let rule = Availability::Slots(vec![1, 3, 5]);
        assert!(rule.is_available(3));
        assert!(!rule.is_available(4));
        assert!(!Availability::Slots(vec![]).is_available(0));
    }

    #[test]
    fn test_available_in_keeps_declaration_order() {
        let catalog = Catalog::default()
            .with_resource(Resource::new("B", 1, 2.0))
            .with_resource(Resource::new("Night", 1, 1.0).with_availability(Availability::window(20, 5)))
            .with_resource(Resource::new("A", 1, 1.0));

        let names: Vec<&str> = catalog.available_in(12).map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(catalog.available_in(23).count(), 3);
    }

    #[test]
    fn test_validate_ok() {
        let catalog = Catalog::new(vec![Resource::new("Solar", 50, 1.0), Resource::new("Hydro", 40, 1.5)]);
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.get("Hydro").map(|r| r.capacity), Some(40));
        assert!(catalog.get("Wind").is_none());
    }

    #[test]
    fn test_validate_duplicate_name() {
        let catalog = Catalog::new(vec![Resource::new("Solar", 50, 1.0), Resource::new("Solar", 10, 2.0)]);
        assert!(catalog.validate().is_err());
    }

    #[test]
    fn test_validate_bad_cost() {
        assert!(Catalog::new(vec![Resource::new("X", 1, -1.0)]).validate().is_err());
        assert!(Catalog::new(vec![Resource::new("X", 1, f64::NAN)]).validate().is_err());
        assert!(Catalog::new(vec![Resource::new(" ", 1, 1.0)]).validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_catalog_json_round_trip() {
        let catalog = Catalog::default()
            .with_resource(Resource::new("Solar", 50, 1.0).with_availability(Availability::window(6, 18)))
            .with_resource(Resource::new("Peaker", 5, 9.0).with_availability(Availability::Slots(vec![18, 19])))
            .with_resource(Resource::new("Diesel", 60, 3.0).discouraged());

        let json = serde_json::to_string(&catalog).unwrap();
        let back: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, catalog);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_catalog_json_defaults() {
        let json = r#"{"resources":[{"name":"Hydro","capacity":40,"unit_cost":1.5}]}"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();
        let hydro = catalog.get("Hydro").unwrap();
        assert_eq!(hydro.availability, Availability::Always);
        assert!(!hydro.discouraged);
    }
}
