//! # Layout Distribution
//!
//! Pure mapping from an ordered component list and a layout kind to named
//! regions. The same function backs the editor preview and final rendering,
//! so it must stay free of side effects and produce identical output for
//! identical input.
//!
//! ## Assignment rules (by position `i` in the input)
//!
//! | Layout          | Regions                  | Rule                              |
//! |-----------------|--------------------------|-----------------------------------|
//! | `single`        | `main`                   | everything                        |
//! | `two-column`    | `left`, `right`          | even → left, odd → right          |
//! | `three-column`  | `col1`, `col2`, `col3`   | `i mod 3`                         |
//! | `sidebar-left`  | `sidebar`, `main`        | `i mod 3 == 0` → sidebar          |
//! | `sidebar-right` | `main`, `sidebar`        | `i mod 3 == 2` → sidebar          |
//! | `custom`        | from section settings    | placement, else `i mod regions`   |
//!
//! These are round-robin rules, not contiguous splits: `two-column` over
//! `[A, B, C, D, E]` yields `left = [A, C, E]`, `right = [B, D]`.

use folio_model::{Component, CustomLayout, LayoutKind, Section};

pub const MAIN: &str = "main";
pub const LEFT: &str = "left";
pub const RIGHT: &str = "right";
pub const COL1: &str = "col1";
pub const COL2: &str = "col2";
pub const COL3: &str = "col3";
pub const SIDEBAR: &str = "sidebar";

/// One named region and the components assigned to it, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct Region<'a> {
    pub name: String,
    pub components: Vec<&'a Component>,
}

impl<'a> Region<'a> {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            components: Vec::new(),
        }
    }
}

/// Ordered set of regions produced by [`distribute`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Regions<'a> {
    regions: Vec<Region<'a>>,
}

impl<'a> Regions<'a> {
    fn with_names(names: &[&str]) -> Self {
        Self {
            regions: names.iter().map(|n| Region::new(*n)).collect(),
        }
    }

    fn push_to(&mut self, index: usize, component: &'a Component) {
        self.regions[index].components.push(component);
    }

    /// Components of the named region, or `None` if the layout has no such region.
    pub fn get(&self, name: &str) -> Option<&[&'a Component]> {
        self.regions
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.components.as_slice())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| r.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region<'a>> {
        self.regions.iter()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Total number of components across all regions.
    pub fn component_count(&self) -> usize {
        self.regions.iter().map(|r| r.components.len()).sum()
    }
}

impl<'r, 'a> IntoIterator for &'r Regions<'a> {
    type Item = &'r Region<'a>;
    type IntoIter = std::slice::Iter<'r, Region<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.regions.iter()
    }
}

/// Distributes `components` into the regions of `layout`.
///
/// `custom` is only consulted for [`LayoutKind::Custom`]; without it (or
/// with an empty region list) a custom section behaves as `single`.
pub fn distribute<'a, I>(components: I, layout: LayoutKind, custom: Option<&CustomLayout>) -> Regions<'a>
where
    I: IntoIterator<Item = &'a Component>,
{
    let components = components.into_iter();

    match layout {
        LayoutKind::Single => by_rule(components, &[MAIN], |_| 0),
        LayoutKind::TwoColumn => by_rule(components, &[LEFT, RIGHT], |i| i % 2),
        LayoutKind::ThreeColumn => by_rule(components, &[COL1, COL2, COL3], |i| i % 3),
        LayoutKind::SidebarLeft => {
            by_rule(components, &[SIDEBAR, MAIN], |i| if i % 3 == 0 { 0 } else { 1 })
        }
        LayoutKind::SidebarRight => {
            by_rule(components, &[MAIN, SIDEBAR], |i| if i % 3 == 2 { 1 } else { 0 })
        }
        LayoutKind::Custom => match custom {
            Some(custom) if !custom.regions.is_empty() => by_custom(components, custom),
            _ => by_rule(components, &[MAIN], |_| 0),
        },
    }
}

/// Distributes a section's components using its own layout and settings.
pub fn distribute_section(section: &Section) -> Regions<'_> {
    distribute(
        section.components.iter(),
        section.layout,
        section.settings.custom_layout.as_ref(),
    )
}

fn by_rule<'a>(
    components: impl Iterator<Item = &'a Component>,
    names: &[&str],
    rule: impl Fn(usize) -> usize,
) -> Regions<'a> {
    let mut regions = Regions::with_names(names);
    for (index, component) in components.enumerate() {
        regions.push_to(rule(index), component);
    }
    regions
}

fn by_custom<'a>(components: impl Iterator<Item = &'a Component>, custom: &CustomLayout) -> Regions<'a> {
    let names: Vec<&str> = custom.regions.iter().map(String::as_str).collect();
    let mut regions = Regions::with_names(&names);
    let count = names.len();

    for (index, component) in components.enumerate() {
        let placed = custom
            .placements
            .get(&component.id)
            .and_then(|region| names.iter().position(|n| *n == region.as_str()));
        regions.push_to(placed.unwrap_or(index % count), component);
    }
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_model::{ComponentContent, SectionId};
    use pretty_assertions::assert_eq;

    fn components(names: &[&str]) -> Vec<Component> {
        let section_id = SectionId::new();
        names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let mut c = Component::new(
                    section_id,
                    *name,
                    ComponentContent::Paragraph {
                        text: name.to_string(),
                    },
                );
                c.order = i as u32;
                c
            })
            .collect()
    }

    fn names<'a>(regions: &'a Regions<'_>, region: &str) -> Vec<&'a str> {
        regions
            .get(region)
            .unwrap()
            .iter()
            .map(|c| c.name.as_str())
            .collect()
    }

    #[test]
    fn test_single_keeps_order() {
        let list = components(&["A", "B", "C"]);
        let regions = distribute(&list, LayoutKind::Single, None);
        assert_eq!(regions.names().collect::<Vec<_>>(), vec![MAIN]);
        assert_eq!(names(&regions, MAIN), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_two_column_alternates() {
        let list = components(&["A", "B", "C", "D", "E"]);
        let regions = distribute(&list, LayoutKind::TwoColumn, None);
        assert_eq!(names(&regions, LEFT), vec!["A", "C", "E"]);
        assert_eq!(names(&regions, RIGHT), vec!["B", "D"]);
    }

    #[test]
    fn test_two_column_single_component() {
        let list = components(&["A"]);
        let regions = distribute(&list, LayoutKind::TwoColumn, None);
        assert_eq!(names(&regions, LEFT), vec!["A"]);
        assert!(regions.get(RIGHT).unwrap().is_empty());
    }

    #[test]
    fn test_three_column_mod_three() {
        let list = components(&["0", "1", "2", "3", "4", "5", "6"]);
        let regions = distribute(&list, LayoutKind::ThreeColumn, None);
        assert_eq!(names(&regions, COL1), vec!["0", "3", "6"]);
        assert_eq!(names(&regions, COL2), vec!["1", "4"]);
        assert_eq!(names(&regions, COL3), vec!["2", "5"]);
    }

    #[test]
    fn test_sidebar_left() {
        let list = components(&["0", "1", "2", "3", "4"]);
        let regions = distribute(&list, LayoutKind::SidebarLeft, None);
        assert_eq!(regions.names().collect::<Vec<_>>(), vec![SIDEBAR, MAIN]);
        assert_eq!(names(&regions, SIDEBAR), vec!["0", "3"]);
        assert_eq!(names(&regions, MAIN), vec!["1", "2", "4"]);
    }

    #[test]
    fn test_sidebar_right() {
        let list = components(&["0", "1", "2", "3", "4", "5"]);
        let regions = distribute(&list, LayoutKind::SidebarRight, None);
        assert_eq!(regions.names().collect::<Vec<_>>(), vec![MAIN, SIDEBAR]);
        assert_eq!(names(&regions, MAIN), vec!["0", "1", "3", "4"]);
        assert_eq!(names(&regions, SIDEBAR), vec!["2", "5"]);
    }

    #[test]
    fn test_empty_input_yields_empty_regions() {
        let list: Vec<Component> = Vec::new();
        for layout in [
            LayoutKind::Single,
            LayoutKind::TwoColumn,
            LayoutKind::ThreeColumn,
            LayoutKind::SidebarLeft,
            LayoutKind::SidebarRight,
            LayoutKind::Custom,
        ] {
            let regions = distribute(&list, layout, None);
            assert!(!regions.is_empty());
            assert_eq!(regions.component_count(), 0);
        }
    }

    #[test]
    fn test_custom_without_settings_is_single() {
        let list = components(&["A", "B"]);
        let regions = distribute(&list, LayoutKind::Custom, None);
        assert_eq!(names(&regions, MAIN), vec!["A", "B"]);

        let empty = CustomLayout::default();
        let regions = distribute(&list, LayoutKind::Custom, Some(&empty));
        assert_eq!(names(&regions, MAIN), vec!["A", "B"]);
    }

    #[test]
    fn test_custom_placements_and_fallback() {
        let list = components(&["A", "B", "C", "D"]);
        let custom = CustomLayout::new(["hero", "aside"])
            .place(list[0].id, "aside")
            .place(list[2].id, "missing");
        let regions = distribute(&list, LayoutKind::Custom, Some(&custom));

        // B, C (unknown region) and D fall back to index mod 2.
        assert_eq!(names(&regions, "hero"), vec!["C"]);
        assert_eq!(names(&regions, "aside"), vec!["A", "B", "D"]);
    }

    #[test]
    fn test_custom_ignores_layout_for_other_kinds() {
        let list = components(&["A", "B"]);
        let custom = CustomLayout::new(["x"]);
        let regions = distribute(&list, LayoutKind::Single, Some(&custom));
        assert_eq!(names(&regions, MAIN), vec!["A", "B"]);
    }
}
