//! Merging of repeated element declarations
//!
//! Several records may describe the same element. They are folded into one
//! declaration in order: defined scalars from the later record win,
//! attribute strings are joined, sub-records are concatenated.

use indexmap::IndexMap;
use log::debug;

use crate::parser::ast::ElementDecl;

fn later<T>(earlier: Option<T>, later: Option<T>) -> Option<T> {
    later.or(earlier)
}

fn join_attributes(earlier: Option<String>, later: Option<String>) -> Option<String> {
    let parts: Vec<String> = [earlier, later]
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

impl ElementDecl {
    /// Fold a later declaration of the same element into this one
    pub fn merge(self, other: ElementDecl) -> ElementDecl {
        let mut properties = self.properties;
        properties.extend(other.properties);
        let mut records = self.records;
        records.extend(other.records);

        ElementDecl {
            name: self.name,
            kind: later(self.kind, other.kind),
            x: later(self.x, other.x),
            y: later(self.y, other.y),
            position_of: later(self.position_of, other.position_of),
            x_of: later(self.x_of, other.x_of),
            y_of: later(self.y_of, other.y_of),
            adjust_x: later(self.adjust_x, other.adjust_x),
            adjust_y: later(self.adjust_y, other.adjust_y),
            w: later(self.w, other.w),
            h: later(self.h, other.h),
            w_of: later(self.w_of, other.w_of),
            h_of: later(self.h_of, other.h_of),
            w_from: later(self.w_from, other.w_from),
            w_to: later(self.w_to, other.w_to),
            h_from: later(self.h_from, other.h_from),
            h_to: later(self.h_to, other.h_to),
            adjust_w: later(self.adjust_w, other.adjust_w),
            adjust_h: later(self.adjust_h, other.adjust_h),
            anchor: later(self.anchor, other.anchor),
            style: later(self.style, other.style),
            attributes: join_attributes(self.attributes, other.attributes),
            properties,
            records,
            from: later(self.from, other.from),
            to: later(self.to, other.to),
        }
    }
}

/// Merge declarations by name, keeping first-seen order
pub fn merge_declarations(
    decls: impl IntoIterator<Item = ElementDecl>,
) -> IndexMap<String, ElementDecl> {
    let mut merged: IndexMap<String, ElementDecl> = IndexMap::new();
    for decl in decls {
        match merged.get_mut(&decl.name) {
            Some(existing) => {
                debug!(element = decl.name.as_str(); "merging repeated declaration");
                let earlier = std::mem::take(existing);
                *existing = earlier.merge(decl);
            }
            None => {
                merged.insert(decl.name.clone(), decl);
            }
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::ast::SubRecord;
    use crate::stylesheet::StyleValue;

    fn record(key: &str) -> SubRecord {
        SubRecord::new([("key".to_string(), StyleValue::from(key))])
    }

    #[test]
    fn test_defined_values_overwrite() {
        let mut a = ElementDecl::new("n");
        a.x = Some(1.0);
        a.y = Some(2.0);
        a.style = Some("custom".to_string());
        let mut b = ElementDecl::new("n");
        b.x = Some(10.0);

        let merged = a.merge(b);
        assert_eq!(merged.x, Some(10.0));
        assert_eq!(merged.y, Some(2.0));
        assert_eq!(merged.style.as_deref(), Some("custom"));
    }

    #[test]
    fn test_attributes_are_joined() {
        let mut a = ElementDecl::new("n");
        a.attributes = Some("draw=red".to_string());
        let mut b = ElementDecl::new("n");
        b.attributes = Some("thick".to_string());
        assert_eq!(
            a.clone().merge(b).attributes.as_deref(),
            Some("draw=red, thick")
        );

        let mut empty = ElementDecl::new("n");
        empty.attributes = Some(String::new());
        assert_eq!(a.merge(empty).attributes.as_deref(), Some("draw=red"));
    }

    #[test]
    fn test_properties_merge_per_key() {
        let mut a = ElementDecl::new("n");
        a.properties.insert("fill".to_string(), StyleValue::from("red"));
        a.properties.insert("draw".to_string(), StyleValue::from("black"));
        let mut b = ElementDecl::new("n");
        b.properties.insert("fill".to_string(), StyleValue::from("blue"));

        let merged = a.merge(b);
        assert_eq!(merged.properties["fill"], StyleValue::from("blue"));
        assert_eq!(merged.properties["draw"], StyleValue::from("black"));
    }

    #[test]
    fn test_records_concatenate() {
        let mut a = ElementDecl::new("t");
        a.records = vec![record("a")];
        let mut b = ElementDecl::new("t");
        b.records = vec![record("b"), record("c")];

        assert_eq!(
            a.merge(b).records,
            vec![record("a"), record("b"), record("c")]
        );
    }

    #[test]
    fn test_merge_declarations_keeps_first_seen_order() {
        let mut first_a = ElementDecl::new("a");
        first_a.x = Some(1.0);
        let mut second_a = ElementDecl::new("a");
        second_a.y = Some(2.0);

        let merged = merge_declarations([
            first_a,
            ElementDecl::new("b"),
            second_a,
            ElementDecl::new("c"),
        ]);

        assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(merged["a"].x, Some(1.0));
        assert_eq!(merged["a"].y, Some(2.0));
    }
}
