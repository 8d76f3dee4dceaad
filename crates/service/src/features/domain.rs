use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Category given to features granted by id alone.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

/// One grantable capability.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Feature {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Feature {
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: Option<String>) -> Self {
        Self { id: id.into(), name: name.into(), category }
    }

    /// Descriptor synthesized for a bare id: named after itself, category `Unknown`.
    pub fn from_id(id: &str) -> Self {
        Self::new(id, id, Some(UNKNOWN_CATEGORY.to_string()))
    }
}

/// Create input as submitted by a client; every field may be absent.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeatureDraft {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
}

impl FeatureDraft {
    /// `None` unless both `id` and `name` are present and non-empty.
    pub fn into_feature(self) -> Option<Feature> {
        let id = self.id.filter(|s| !s.is_empty())?;
        let name = self.name.filter(|s| !s.is_empty())?;
        Some(Feature { id, name, category: self.category })
    }
}

/// Features granted to one role, in grant order.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoleFeatures {
    pub role: String,
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// Role → feature list mapping. Roles keep the order of their first write.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FeatureMap {
    roles: Vec<RoleFeatures>,
}

impl FeatureMap {
    pub fn new() -> Self { Self::default() }

    /// Build from entries that may repeat a role; repeats merge under the create rule.
    pub fn from_roles(entries: Vec<RoleFeatures>) -> Self {
        let mut map = Self::new();
        for entry in entries {
            map.entry_mut(&entry.role);
            for feature in entry.features {
                map.insert_feature(&entry.role, feature);
            }
        }
        map
    }

    pub fn is_empty(&self) -> bool { self.roles.is_empty() }

    pub fn roles(&self) -> &[RoleFeatures] { &self.roles }

    pub fn contains_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.role == role)
    }

    /// The role's features; empty for a role never written.
    pub fn features_for(&self, role: &str) -> &[Feature] {
        self.roles
            .iter()
            .find(|r| r.role == role)
            .map(|r| r.features.as_slice())
            .unwrap_or(&[])
    }

    fn entry_mut(&mut self, role: &str) -> &mut Vec<Feature> {
        let idx = match self.roles.iter().position(|r| r.role == role) {
            Some(idx) => idx,
            None => {
                self.roles.push(RoleFeatures { role: role.to_string(), features: Vec::new() });
                self.roles.len() - 1
            }
        };
        &mut self.roles[idx].features
    }

    /// Distinct non-empty categories across all roles, first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for feature in self.roles.iter().flat_map(|r| r.features.iter()) {
            if let Some(category) = feature.category.as_deref() {
                if !category.is_empty() && seen.insert(category) {
                    out.push(category.to_string());
                }
            }
        }
        out
    }

    /// Features de-duplicated by id across roles (first occurrence wins),
    /// then filtered to an exact category match.
    pub fn features_by_category(&self, category: &str) -> Vec<Feature> {
        let mut seen = HashSet::new();
        self.roles
            .iter()
            .flat_map(|r| r.features.iter())
            .filter(|f| seen.insert(f.id.as_str()))
            .filter(|f| f.category.as_deref() == Some(category))
            .cloned()
            .collect()
    }

    /// Append unless the role already holds the id. Returns whether it was appended.
    pub fn insert_feature(&mut self, role: &str, feature: Feature) -> bool {
        let features = self.entry_mut(role);
        if features.iter().any(|f| f.id == feature.id) {
            return false;
        }
        features.push(feature);
        true
    }

    /// Grant placeholder descriptors for ids the role lacks. Returns how many were added.
    pub fn add_feature_ids(&mut self, role: &str, ids: &[String]) -> usize {
        let features = self.entry_mut(role);
        let mut added = 0;
        for id in ids {
            if !features.iter().any(|f| &f.id == id) {
                features.push(Feature::from_id(id));
                added += 1;
            }
        }
        added
    }

    /// Drop every feature whose id is listed. The role entry exists afterwards
    /// even if it did not before. Returns how many were removed.
    pub fn remove_feature_ids(&mut self, role: &str, ids: &[String]) -> usize {
        let remove: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let features = self.entry_mut(role);
        let before = features.len();
        features.retain(|f| !remove.contains(f.id.as_str()));
        before - features.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(v: &[&str]) -> Vec<String> { v.iter().map(|s| s.to_string()).collect() }

    fn feat(id: &str, name: &str, category: &str) -> Feature {
        Feature::new(id, name, Some(category.to_string()))
    }

    #[test]
    fn unknown_role_lists_empty() {
        let map = FeatureMap::new();
        assert!(map.features_for("sales").is_empty());
        assert!(!map.contains_role("sales"));
    }

    #[test]
    fn insert_keeps_existing_entry_on_duplicate_id() {
        let mut map = FeatureMap::new();
        assert!(map.insert_feature("sales", feat("dial", "Dialer", "Calling")));
        assert!(!map.insert_feature("sales", feat("dial", "Other", "Misc")));
        assert_eq!(map.features_for("sales"), &[feat("dial", "Dialer", "Calling")]);
    }

    #[test]
    fn bulk_add_skips_duplicates_within_call() {
        let mut map = FeatureMap::new();
        assert_eq!(map.add_feature_ids("sales", &ids(&["a", "a", "b"])), 2);
        let features = map.features_for("sales");
        assert_eq!(features, &[Feature::from_id("a"), Feature::from_id("b")]);
        assert_eq!(features[0].name, "a");
        assert_eq!(features[0].category.as_deref(), Some(UNKNOWN_CATEGORY));
    }

    #[test]
    fn bulk_add_leaves_existing_descriptor() {
        let mut map = FeatureMap::new();
        map.insert_feature("sales", feat("a", "Alpha", "Calling"));
        assert_eq!(map.add_feature_ids("sales", &ids(&["a"])), 0);
        assert_eq!(map.features_for("sales")[0].name, "Alpha");
    }

    #[test]
    fn bulk_remove_filters_listed_ids() {
        let mut map = FeatureMap::new();
        map.add_feature_ids("sales", &ids(&["a", "b"]));
        assert_eq!(map.remove_feature_ids("sales", &ids(&["a"])), 1);
        assert_eq!(map.features_for("sales"), &[Feature::from_id("b")]);
    }

    #[test]
    fn bulk_remove_on_unknown_role_creates_empty_entry() {
        let mut map = FeatureMap::new();
        assert_eq!(map.remove_feature_ids("ghost", &ids(&["x"])), 0);
        assert!(map.contains_role("ghost"));
        assert!(map.features_for("ghost").is_empty());
    }

    #[test]
    fn categories_are_distinct_and_skip_empty() {
        let mut map = FeatureMap::new();
        assert!(map.categories().is_empty());
        map.insert_feature("sales", feat("dial", "Dialer", "Calling"));
        map.insert_feature("sales", Feature::new("notes", "Notes", None));
        map.insert_feature("sales", feat("blank", "Blank", ""));
        map.insert_feature("admin", feat("dial", "Dialer", "Calling"));
        map.insert_feature("admin", feat("csv", "CSV import", "Leads"));
        assert_eq!(map.categories(), vec!["Calling".to_string(), "Leads".to_string()]);
    }

    #[test]
    fn by_category_dedupes_by_first_occurrence() {
        let mut map = FeatureMap::new();
        map.insert_feature("sales", feat("dial", "Dialer", "Calling"));
        map.insert_feature("admin", feat("dial", "Dialer v2", "Calling"));
        map.insert_feature("admin", feat("sms", "SMS", "Calling"));
        // first occurrence of `x` is not in the category, so the later match is hidden
        map.insert_feature("sales", feat("x", "X", "Leads"));
        map.insert_feature("admin", feat("x", "X", "Calling"));

        let calling = map.features_by_category("Calling");
        assert_eq!(calling, vec![feat("dial", "Dialer", "Calling"), feat("sms", "SMS", "Calling")]);
        assert!(map.features_by_category("calling").is_empty());
    }

    #[test]
    fn draft_requires_non_empty_id_and_name() {
        let ok = FeatureDraft { id: Some("dial".into()), name: Some("Dialer".into()), category: None };
        assert_eq!(ok.into_feature(), Some(Feature::new("dial", "Dialer", None)));

        let no_name = FeatureDraft { id: Some("dial".into()), name: Some(String::new()), category: None };
        assert!(no_name.into_feature().is_none());
        assert!(FeatureDraft::default().into_feature().is_none());
    }

    #[test]
    fn from_roles_merges_repeated_roles_in_order() {
        let map = FeatureMap::from_roles(vec![
            RoleFeatures { role: "sales".into(), features: vec![feat("a", "A", "X")] },
            RoleFeatures { role: "ops".into(), features: vec![] },
            RoleFeatures { role: "sales".into(), features: vec![feat("a", "A2", "Y"), feat("b", "B", "X")] },
        ]);
        let roles: Vec<&str> = map.roles().iter().map(|r| r.role.as_str()).collect();
        assert_eq!(roles, vec!["sales", "ops"]);
        assert_eq!(map.features_for("sales"), &[feat("a", "A", "X"), feat("b", "B", "X")]);
    }

    #[test]
    fn json_shape_is_a_role_array() {
        let mut map = FeatureMap::new();
        map.insert_feature("sales", Feature::new("dial", "Dialer", None));
        let v = serde_json::to_value(&map).unwrap();
        assert_eq!(v, serde_json::json!([{"role": "sales", "features": [{"id": "dial", "name": "Dialer"}]}]));
        let back: FeatureMap = serde_json::from_value(v).unwrap();
        assert_eq!(back, map);
    }
}
