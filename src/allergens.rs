//! Allergens
//!
//! Free-text allergen labels attached to menu products, normalised to
//! lower case, sorted and de-duplicated.

use smallvec::SmallVec;

/// A set of allergen labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allergens {
    labels: SmallVec<[String; 4]>,
}

impl Allergens {
    /// Create a set from string slices.
    pub fn from_strs(labels: &[&str]) -> Self {
        labels.iter().copied().collect()
    }

    /// Whether the set contains the label, ignoring case.
    pub fn contains(&self, label: &str) -> bool {
        let label = label.trim().to_lowercase();

        self.labels.binary_search(&label).is_ok()
    }

    /// Whether the set has no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterate over the labels in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for Allergens {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut labels: SmallVec<[String; 4]> = iter
            .into_iter()
            .map(|label| label.as_ref().trim().to_lowercase())
            .filter(|label| !label.is_empty())
            .collect();

        labels.sort();
        labels.dedup();

        Self { labels }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_normalised() {
        let allergens = Allergens::from_strs(&["Milk", "gluten", "milk", " "]);

        assert_eq!(allergens.iter().collect::<Vec<_>>(), vec!["gluten", "milk"]);
    }

    #[test]
    fn contains_ignores_case() {
        let allergens = Allergens::from_strs(&["nuts"]);

        assert!(allergens.contains("Nuts"));
        assert!(!allergens.contains("soy"));
        assert!(Allergens::default().is_empty());
    }
}
