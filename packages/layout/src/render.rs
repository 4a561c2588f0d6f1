//! # Region Rendering
//!
//! Applies a per-component renderer to distributed regions. The output is a
//! display tree for the presentation layer; markup and styling are not
//! produced here.
//!
//! ```text
//! Section ──distribute──▶ Regions ──render_regions──▶ RenderedTree
//!                                   (ComponentRenderer per component)
//! ```
//!
//! Nested components (`parent_id`) are not distributed. They are rendered as
//! children of their parent's display node.

use crate::distribute::{distribute, Regions};
use folio_model::{
    Component, ComponentContent, ComponentId, LayoutKind, Page, PageId, Section, SectionId,
    SectionSettings,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Display tree node handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DisplayNode {
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        children: Vec<DisplayNode>,
        /// Component that produced this node (top-level node of a component only)
        #[serde(skip_serializing_if = "Option::is_none")]
        component_id: Option<ComponentId>,
    },

    Text { content: String },
}

impl DisplayNode {
    pub fn element(tag: impl Into<String>) -> Self {
        DisplayNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            component_id: None,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        DisplayNode::Text {
            content: content.into(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let DisplayNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_child(mut self, child: DisplayNode) -> Self {
        if let DisplayNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<DisplayNode>) -> Self {
        if let DisplayNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    pub fn with_component(mut self, id: ComponentId) -> Self {
        if let DisplayNode::Element {
            ref mut component_id,
            ..
        } = self
        {
            *component_id = Some(id);
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            DisplayNode::Element { tag, .. } => Some(tag),
            DisplayNode::Text { .. } => None,
        }
    }

    pub fn children(&self) -> &[DisplayNode] {
        match self {
            DisplayNode::Element { children, .. } => children,
            DisplayNode::Text { .. } => &[],
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn text_content(&self) -> String {
        match self {
            DisplayNode::Text { content } => content.clone(),
            DisplayNode::Element { children, .. } => {
                children.iter().map(DisplayNode::text_content).collect()
            }
        }
    }
}

/// Maps one component's typed content to a display node.
pub trait ComponentRenderer {
    fn render(&self, component: &Component) -> DisplayNode;
}

impl<F> ComponentRenderer for F
where
    F: Fn(&Component) -> DisplayNode,
{
    fn render(&self, component: &Component) -> DisplayNode {
        self(component)
    }
}

/// Options for section and page rendering
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Render components flagged `hidden` (editor preview)
    pub include_hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedRegion {
    pub name: String,
    pub nodes: Vec<DisplayNode>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RenderedTree {
    pub regions: Vec<RenderedRegion>,
}

impl RenderedTree {
    pub fn region(&self, name: &str) -> Option<&RenderedRegion> {
        self.regions.iter().find(|r| r.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedSection {
    pub section_id: SectionId,
    pub name: String,
    pub layout: LayoutKind,
    pub settings: SectionSettings,
    pub tree: RenderedTree,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedPage {
    pub page_id: PageId,
    pub title: String,
    pub path: String,
    pub sections: Vec<RenderedSection>,
}

/// Renders every component of every region, keeping region grouping.
pub fn render_regions(regions: &Regions<'_>, renderer: &dyn ComponentRenderer) -> RenderedTree {
    RenderedTree {
        regions: regions
            .iter()
            .map(|region| RenderedRegion {
                name: region.name.clone(),
                nodes: region
                    .components
                    .iter()
                    .map(|component| renderer.render(component))
                    .collect(),
            })
            .collect(),
    }
}

/// Distributes the section's visible root components and renders them,
/// nesting child components under their parents.
pub fn render_section(
    section: &Section,
    renderer: &dyn ComponentRenderer,
    options: &RenderOptions,
) -> RenderedSection {
    let nested = NestedRenderer {
        section,
        inner: renderer,
        options,
    };
    let roots = section
        .root_components()
        .filter(|c| options.include_hidden || !c.hidden);
    let regions = distribute(roots, section.layout, section.settings.custom_layout.as_ref());

    debug!(
        section_id = %section.id,
        layout = %section.layout,
        regions = regions.len(),
        components = regions.component_count(),
        "Rendering section"
    );

    RenderedSection {
        section_id: section.id,
        name: section.name.clone(),
        layout: section.layout,
        settings: section.settings.clone(),
        tree: render_regions(&regions, &nested),
    }
}

pub fn render_page(page: &Page, renderer: &dyn ComponentRenderer, options: &RenderOptions) -> RenderedPage {
    RenderedPage {
        page_id: page.id,
        title: page.title.clone(),
        path: page.path.clone(),
        sections: page
            .sections
            .iter()
            .map(|section| render_section(section, renderer, options))
            .collect(),
    }
}

struct NestedRenderer<'a> {
    section: &'a Section,
    inner: &'a dyn ComponentRenderer,
    options: &'a RenderOptions,
}

impl NestedRenderer<'_> {
    fn render_with_children(&self, component: &Component, depth: usize) -> DisplayNode {
        let node = self.inner.render(component);
        // Depth bound keeps a malformed parent cycle from recursing forever.
        if depth >= self.section.components.len() {
            return node;
        }
        let children = self
            .section
            .children_of(&component.id)
            .filter(|c| self.options.include_hidden || !c.hidden)
            .map(|child| self.render_with_children(child, depth + 1))
            .collect();
        node.with_children(children)
    }
}

impl ComponentRenderer for NestedRenderer<'_> {
    fn render(&self, component: &Component) -> DisplayNode {
        self.render_with_children(component, 0)
    }
}

/// Plain structural mapping for every built-in content type.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRenderer;

impl ComponentRenderer for DefaultRenderer {
    fn render(&self, component: &Component) -> DisplayNode {
        render_content(&component.content)
            .with_attr("data-component", component.component_type().as_str())
            .with_component(component.id)
    }
}

fn render_content(content: &ComponentContent) -> DisplayNode {
    match content {
        ComponentContent::Heading { text, level } => {
            DisplayNode::element(format!("h{}", (*level).clamp(1, 6))).with_child(DisplayNode::text(text))
        }
        ComponentContent::Paragraph { text } => DisplayNode::element("p").with_child(DisplayNode::text(text)),
        ComponentContent::RichText { html } => DisplayNode::element("div")
            .with_attr("class", "rich-text")
            .with_child(DisplayNode::text(html)),
        ComponentContent::Image {
            src,
            alt,
            width,
            height,
        } => {
            let mut node = DisplayNode::element("img").with_attr("src", src).with_attr("alt", alt);
            if let Some(width) = width {
                node = node.with_attr("width", width.to_string());
            }
            if let Some(height) = height {
                node = node.with_attr("height", height.to_string());
            }
            node
        }
        ComponentContent::Video {
            src,
            autoplay,
            controls,
        } => {
            let mut node = DisplayNode::element("video").with_attr("src", src);
            if *autoplay {
                node = node.with_attr("autoplay", "true");
            }
            if *controls {
                node = node.with_attr("controls", "true");
            }
            node
        }
        ComponentContent::Gallery { images } => DisplayNode::element("div")
            .with_attr("class", "gallery")
            .with_children(
                images
                    .iter()
                    .map(|image| {
                        DisplayNode::element("img")
                            .with_attr("src", &image.src)
                            .with_attr("alt", &image.alt)
                    })
                    .collect(),
            ),
        ComponentContent::Quote { text, attribution } => {
            let mut node = DisplayNode::element("blockquote").with_child(DisplayNode::text(text));
            if let Some(attribution) = attribution {
                node = node.with_child(DisplayNode::element("cite").with_child(DisplayNode::text(attribution)));
            }
            node
        }
        ComponentContent::List { items, ordered } => {
            DisplayNode::element(if *ordered { "ol" } else { "ul" }).with_children(
                items
                    .iter()
                    .map(|item| DisplayNode::element("li").with_child(DisplayNode::text(item)))
                    .collect(),
            )
        }
        ComponentContent::Divider { style, color } => {
            let mut node = DisplayNode::element("hr").with_attr("data-style", style);
            if let Some(color) = color {
                node = node.with_attr("data-color", color);
            }
            node
        }
        ComponentContent::Spacer { height } => {
            DisplayNode::element("div").with_attr("data-height", height.to_string())
        }
        ComponentContent::Card { title, body, image } => {
            let mut node = DisplayNode::element("article").with_attr("class", "card");
            if let Some(image) = image {
                node = node.with_child(DisplayNode::element("img").with_attr("src", image).with_attr("alt", title));
            }
            node.with_child(DisplayNode::element("h3").with_child(DisplayNode::text(title)))
                .with_child(DisplayNode::element("p").with_child(DisplayNode::text(body)))
        }
        ComponentContent::Button { label, href, variant } => {
            let mut node = match href {
                Some(href) => DisplayNode::element("a").with_attr("href", href),
                None => DisplayNode::element("button"),
            };
            if let Some(variant) = variant {
                node = node.with_attr("data-variant", variant);
            }
            node.with_child(DisplayNode::text(label))
        }
        ComponentContent::CallToAction {
            heading,
            text,
            button_text,
            button_href,
        } => {
            let button = match button_href {
                Some(href) => DisplayNode::element("a").with_attr("href", href),
                None => DisplayNode::element("button"),
            };
            DisplayNode::element("section")
                .with_attr("class", "cta")
                .with_child(DisplayNode::element("h3").with_child(DisplayNode::text(heading)))
                .with_child(DisplayNode::element("p").with_child(DisplayNode::text(text)))
                .with_child(button.with_child(DisplayNode::text(button_text)))
        }
        ComponentContent::Form { fields, submit_label } => {
            let mut node = DisplayNode::element("form");
            for field in fields {
                let mut input = DisplayNode::element("input")
                    .with_attr("name", &field.name)
                    .with_attr("type", field.kind.as_str());
                if field.required {
                    input = input.with_attr("required", "true");
                }
                node = node.with_child(
                    DisplayNode::element("label")
                        .with_child(DisplayNode::text(&field.label))
                        .with_child(input),
                );
            }
            node.with_child(
                DisplayNode::element("button")
                    .with_attr("type", "submit")
                    .with_child(DisplayNode::text(submit_label)),
            )
        }
        ComponentContent::Map { address, zoom } => DisplayNode::element("div")
            .with_attr("class", "map")
            .with_attr("data-address", address)
            .with_attr("data-zoom", zoom.to_string()),
        ComponentContent::Accordion { items } => DisplayNode::element("div")
            .with_attr("class", "accordion")
            .with_children(
                items
                    .iter()
                    .map(|item| {
                        DisplayNode::element("details")
                            .with_child(DisplayNode::element("summary").with_child(DisplayNode::text(&item.title)))
                            .with_child(DisplayNode::text(&item.body))
                    })
                    .collect(),
            ),
        ComponentContent::Tabs { tabs } => DisplayNode::element("div").with_attr("class", "tabs").with_children(
            tabs.iter()
                .map(|tab| {
                    DisplayNode::element("div")
                        .with_attr("data-tab", &tab.label)
                        .with_child(DisplayNode::text(&tab.body))
                })
                .collect(),
        ),
        ComponentContent::Testimonial { quote, author, role } => {
            let caption = match role {
                Some(role) => format!("{author}, {role}"),
                None => author.clone(),
            };
            DisplayNode::element("figure")
                .with_child(DisplayNode::element("blockquote").with_child(DisplayNode::text(quote)))
                .with_child(DisplayNode::element("figcaption").with_child(DisplayNode::text(caption)))
        }
        ComponentContent::PricingTable { plans } => DisplayNode::element("div")
            .with_attr("class", "pricing-table")
            .with_children(
                plans
                    .iter()
                    .map(|plan| {
                        let mut node = DisplayNode::element("div")
                            .with_attr("class", "plan")
                            .with_child(DisplayNode::element("h4").with_child(DisplayNode::text(&plan.name)))
                            .with_child(DisplayNode::element("strong").with_child(DisplayNode::text(&plan.price)))
                            .with_child(
                                DisplayNode::element("ul").with_children(
                                    plan.features
                                        .iter()
                                        .map(|f| DisplayNode::element("li").with_child(DisplayNode::text(f)))
                                        .collect(),
                                ),
                            );
                        if plan.highlighted {
                            node = node.with_attr("data-highlighted", "true");
                        }
                        node
                    })
                    .collect(),
            ),
        ComponentContent::Container { gap } => {
            let node = DisplayNode::element("div").with_attr("class", "container");
            match gap {
                Some(gap) => node.with_attr("data-gap", gap.to_string()),
                None => node,
            }
        }
        ComponentContent::Custom { kind, props } => DisplayNode::element("div")
            .with_attr("data-kind", kind)
            .with_attr("data-props", props.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribute::{LEFT, MAIN, RIGHT};
    use folio_model::{ComponentType, FormField, FormFieldKind};
    use pretty_assertions::assert_eq;

    fn section_with(layout: LayoutKind, contents: Vec<ComponentContent>) -> Section {
        let mut section = Section::new(PageId::new(), "Body", layout);
        for (i, content) in contents.into_iter().enumerate() {
            let mut c = Component::new(section.id, format!("c{i}"), content);
            c.order = i as u32;
            section.components.push(c);
        }
        section
    }

    fn paragraph(text: &str) -> ComponentContent {
        ComponentContent::Paragraph {
            text: text.to_string(),
        }
    }

    #[test]
    fn test_default_renderer_heading() {
        let section = section_with(
            LayoutKind::Single,
            vec![ComponentContent::Heading {
                text: "Hi".to_string(),
                level: 1,
            }],
        );
        let node = DefaultRenderer.render(&section.components[0]);
        assert_eq!(node.tag(), Some("h1"));
        assert_eq!(node.text_content(), "Hi");
    }

    #[test]
    fn test_every_type_renders_an_element() {
        let section = section_with(
            LayoutKind::Single,
            ComponentType::ALL.iter().map(|t| ComponentContent::default_for(*t)).collect(),
        );
        for component in &section.components {
            assert!(DefaultRenderer.render(component).tag().is_some());
        }
    }

    #[test]
    fn test_render_regions_keeps_grouping() {
        let section = section_with(
            LayoutKind::TwoColumn,
            vec![paragraph("A"), paragraph("B"), paragraph("C")],
        );
        let rendered = render_section(&section, &DefaultRenderer, &RenderOptions::default());
        let left: Vec<String> = rendered.tree.region(LEFT).unwrap().nodes.iter().map(|n| n.text_content()).collect();
        let right: Vec<String> = rendered.tree.region(RIGHT).unwrap().nodes.iter().map(|n| n.text_content()).collect();
        assert_eq!(left, vec!["A", "C"]);
        assert_eq!(right, vec!["B"]);
    }

    #[test]
    fn test_nested_children_render_under_parent() {
        let mut section = section_with(
            LayoutKind::TwoColumn,
            vec![
                ComponentContent::Container { gap: Some(8) },
                paragraph("inside"),
                paragraph("after"),
            ],
        );
        let parent_id = section.components[0].id;
        section.components[1].parent_id = Some(parent_id);

        let rendered = render_section(&section, &DefaultRenderer, &RenderOptions::default());
        let left = &rendered.tree.region(LEFT).unwrap().nodes;
        let right = &rendered.tree.region(RIGHT).unwrap().nodes;

        // Only roots are distributed: container → left, "after" → right.
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].children().len(), 1);
        assert_eq!(left[0].children()[0].text_content(), "inside");
        assert_eq!(right[0].text_content(), "after");
    }

    #[test]
    fn test_hidden_components_skipped_unless_requested() {
        let mut section = section_with(LayoutKind::Single, vec![paragraph("shown"), paragraph("secret")]);
        section.components[1].hidden = true;

        let rendered = render_section(&section, &DefaultRenderer, &RenderOptions::default());
        assert_eq!(rendered.tree.region(MAIN).unwrap().nodes.len(), 1);

        let preview = render_section(&section, &DefaultRenderer, &RenderOptions { include_hidden: true });
        assert_eq!(preview.tree.region(MAIN).unwrap().nodes.len(), 2);
    }

    #[test]
    fn test_closure_renderer() {
        let section = section_with(LayoutKind::Single, vec![paragraph("x")]);
        let renderer = |c: &Component| DisplayNode::text(c.name.clone());
        let rendered = render_section(&section, &renderer, &RenderOptions::default());
        assert_eq!(rendered.tree.region(MAIN).unwrap().nodes, vec![DisplayNode::text("c0")]);
    }

    #[test]
    fn test_form_inputs_carry_field_kind() {
        let section = section_with(
            LayoutKind::Single,
            vec![ComponentContent::Form {
                fields: vec![FormField {
                    name: "email".to_string(),
                    label: "Email".to_string(),
                    kind: FormFieldKind::Email,
                    required: true,
                    options: Vec::new(),
                }],
                submit_label: "Send".to_string(),
            }],
        );
        let node = DefaultRenderer.render(&section.components[0]);
        assert_eq!(node.tag(), Some("form"));

        let input = &node.children()[0].children()[1];
        let DisplayNode::Element { tag, attributes, .. } = input else {
            panic!("expected an input element");
        };
        assert_eq!(tag, "input");
        assert_eq!(attributes.get("type").map(String::as_str), Some("email"));
        assert_eq!(attributes.get("required").map(String::as_str), Some("true"));
    }
}
