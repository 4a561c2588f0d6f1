//! Derivation of an editable copy from a (typically locked) page.

use chrono::Utc;
use folio_editor::copy_section;
use folio_model::{Page, PageId, PageOrigin};

/// Deep-copies `source` into a new page at `path`.
///
/// Every section and component gets a fresh identifier. The copy is
/// unlocked, unpublished, has no history yet and records where it came from.
pub fn derive_page(source: &Page, path: String) -> Page {
    let id = PageId::new();
    let now = Utc::now();

    Page {
        id,
        tenant_id: source.tenant_id,
        title: format!("{} (Copy)", source.title),
        path,
        description: source.description.clone(),
        page_type: source.page_type,
        published: false,
        published_at: None,
        seo: source.seo.clone(),
        locked: false,
        origin: PageOrigin::Derived,
        derived_from: Some(source.id),
        revision: 0,
        sections: source.sections.iter().map(|s| copy_section(s, id)).collect(),
        created_at: now,
        updated_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_model::{validate, Component, ComponentContent, LayoutKind, Section, TenantId};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn test_derived_page_is_independent() {
        let mut source = Page::new(TenantId::new(), "Landing", "/landing");
        source.locked = true;
        source.origin = PageOrigin::Pro;
        source.published = true;

        let mut section = Section::new(source.id, "Hero", LayoutKind::TwoColumn);
        let parent = Component::new(section.id, "box", ComponentContent::Container { gap: None });
        let mut child = Component::new(
            section.id,
            "title",
            ComponentContent::Heading {
                text: "Hi".to_string(),
                level: 1,
            },
        );
        child.parent_id = Some(parent.id);
        child.order = 1;
        section.components.extend([parent, child]);
        source.sections.push(section);

        let copy = derive_page(&source, "/landing-copy".to_string());

        assert_eq!(copy.title, "Landing (Copy)");
        assert!(!copy.locked);
        assert!(!copy.published);
        assert_eq!(copy.origin, PageOrigin::Derived);
        assert_eq!(copy.derived_from, Some(source.id));
        assert_eq!(copy.sections[0].name, "Hero");
        assert!(validate(&copy).is_ok());

        let original: HashSet<_> = source.components().map(|c| c.id).collect();
        assert!(copy.components().all(|c| !original.contains(&c.id)));
        assert_eq!(
            copy.components().map(|c| &c.content).collect::<Vec<_>>(),
            source.components().map(|c| &c.content).collect::<Vec<_>>()
        );
        let new_parent = copy.sections[0].components[0].id;
        assert_eq!(copy.sections[0].components[1].parent_id, Some(new_parent));
    }
}
