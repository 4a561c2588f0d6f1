//! # Component Content
//!
//! Type-specific payloads for components.
//!
//! Each component type owns a strongly-typed variant of [`ComponentContent`].
//! The variant tag doubles as the component type, so a component's type is
//! always derivable from its content and can be checked exhaustively.
//!
//! ```text
//! { "type": "heading", "text": "Welcome", "level": 1 }
//! { "type": "image", "src": "/hero.png", "alt": "Hero", "width": 1200 }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of content unit a component renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentType {
    Heading,
    Paragraph,
    RichText,
    Image,
    Video,
    Gallery,
    Quote,
    List,
    Divider,
    Spacer,
    Card,
    Button,
    #[serde(rename = "cta", alias = "call-to-action")]
    CallToAction,
    Form,
    Map,
    Accordion,
    Tabs,
    Testimonial,
    PricingTable,
    Container,
    Custom,
}

impl ComponentType {
    pub const ALL: [ComponentType; 21] = [
        ComponentType::Heading,
        ComponentType::Paragraph,
        ComponentType::RichText,
        ComponentType::Image,
        ComponentType::Video,
        ComponentType::Gallery,
        ComponentType::Quote,
        ComponentType::List,
        ComponentType::Divider,
        ComponentType::Spacer,
        ComponentType::Card,
        ComponentType::Button,
        ComponentType::CallToAction,
        ComponentType::Form,
        ComponentType::Map,
        ComponentType::Accordion,
        ComponentType::Tabs,
        ComponentType::Testimonial,
        ComponentType::PricingTable,
        ComponentType::Container,
        ComponentType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentType::Heading => "heading",
            ComponentType::Paragraph => "paragraph",
            ComponentType::RichText => "rich-text",
            ComponentType::Image => "image",
            ComponentType::Video => "video",
            ComponentType::Gallery => "gallery",
            ComponentType::Quote => "quote",
            ComponentType::List => "list",
            ComponentType::Divider => "divider",
            ComponentType::Spacer => "spacer",
            ComponentType::Card => "card",
            ComponentType::Button => "button",
            ComponentType::CallToAction => "cta",
            ComponentType::Form => "form",
            ComponentType::Map => "map",
            ComponentType::Accordion => "accordion",
            ComponentType::Tabs => "tabs",
            ComponentType::Testimonial => "testimonial",
            ComponentType::PricingTable => "pricing-table",
            ComponentType::Container => "container",
            ComponentType::Custom => "custom",
        }
    }

    /// Whether components of this type may be used as a `parent_id` target.
    pub fn accepts_children(&self) -> bool {
        matches!(
            self,
            ComponentType::Container
                | ComponentType::Card
                | ComponentType::Accordion
                | ComponentType::Tabs
                | ComponentType::Custom
        )
    }
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComponentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "call-to-action" {
            return Ok(ComponentType::CallToAction);
        }
        ComponentType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown component type: {s}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub src: String,
    #[serde(default)]
    pub alt: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormFieldKind {
    Text,
    Email,
    Phone,
    Number,
    Textarea,
    Checkbox,
    Select,
}

impl FormFieldKind {
    /// Wire name, also used as the rendered input type.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormFieldKind::Text => "text",
            FormFieldKind::Email => "email",
            FormFieldKind::Phone => "phone",
            FormFieldKind::Number => "number",
            FormFieldKind::Textarea => "textarea",
            FormFieldKind::Checkbox => "checkbox",
            FormFieldKind::Select => "select",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub label: String,
    pub kind: FormFieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccordionItem {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabItem {
    pub label: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPlan {
    pub name: String,
    pub price: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub highlighted: bool,
}

/// Type-specific component payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ComponentContent {
    Heading {
        text: String,
        level: u8,
    },
    Paragraph {
        text: String,
    },
    RichText {
        html: String,
    },
    Image {
        src: String,
        #[serde(default)]
        alt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<u32>,
    },
    Video {
        src: String,
        #[serde(default)]
        autoplay: bool,
        #[serde(default = "default_true")]
        controls: bool,
    },
    Gallery {
        images: Vec<GalleryImage>,
    },
    Quote {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attribution: Option<String>,
    },
    List {
        items: Vec<String>,
        #[serde(default)]
        ordered: bool,
    },
    Divider {
        #[serde(default = "default_divider_style")]
        style: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        color: Option<String>,
    },
    Spacer {
        height: u32,
    },
    Card {
        title: String,
        body: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        image: Option<String>,
    },
    Button {
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        href: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        variant: Option<String>,
    },
    #[serde(rename = "cta", alias = "call-to-action")]
    CallToAction {
        heading: String,
        text: String,
        button_text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        button_href: Option<String>,
    },
    Form {
        fields: Vec<FormField>,
        submit_label: String,
    },
    Map {
        address: String,
        #[serde(default = "default_zoom")]
        zoom: u8,
    },
    Accordion {
        items: Vec<AccordionItem>,
    },
    Tabs {
        tabs: Vec<TabItem>,
    },
    Testimonial {
        quote: String,
        author: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        role: Option<String>,
    },
    PricingTable {
        plans: Vec<PricingPlan>,
    },
    Container {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        gap: Option<u32>,
    },
    Custom {
        kind: String,
        #[serde(default)]
        props: serde_json::Value,
    },
}

fn default_true() -> bool {
    true
}

fn default_divider_style() -> String {
    "solid".to_string()
}

fn default_zoom() -> u8 {
    14
}

impl ComponentContent {
    pub fn component_type(&self) -> ComponentType {
        match self {
            ComponentContent::Heading { .. } => ComponentType::Heading,
            ComponentContent::Paragraph { .. } => ComponentType::Paragraph,
            ComponentContent::RichText { .. } => ComponentType::RichText,
            ComponentContent::Image { .. } => ComponentType::Image,
            ComponentContent::Video { .. } => ComponentType::Video,
            ComponentContent::Gallery { .. } => ComponentType::Gallery,
            ComponentContent::Quote { .. } => ComponentType::Quote,
            ComponentContent::List { .. } => ComponentType::List,
            ComponentContent::Divider { .. } => ComponentType::Divider,
            ComponentContent::Spacer { .. } => ComponentType::Spacer,
            ComponentContent::Card { .. } => ComponentType::Card,
            ComponentContent::Button { .. } => ComponentType::Button,
            ComponentContent::CallToAction { .. } => ComponentType::CallToAction,
            ComponentContent::Form { .. } => ComponentType::Form,
            ComponentContent::Map { .. } => ComponentType::Map,
            ComponentContent::Accordion { .. } => ComponentType::Accordion,
            ComponentContent::Tabs { .. } => ComponentType::Tabs,
            ComponentContent::Testimonial { .. } => ComponentType::Testimonial,
            ComponentContent::PricingTable { .. } => ComponentType::PricingTable,
            ComponentContent::Container { .. } => ComponentType::Container,
            ComponentContent::Custom { .. } => ComponentType::Custom,
        }
    }

    /// Starter content used when a component is added from the library.
    pub fn default_for(component_type: ComponentType) -> Self {
        match component_type {
            ComponentType::Heading => ComponentContent::Heading {
                text: "Heading".to_string(),
                level: 2,
            },
            ComponentType::Paragraph => ComponentContent::Paragraph {
                text: "Add your text here.".to_string(),
            },
            ComponentType::RichText => ComponentContent::RichText {
                html: "<p>Add your text here.</p>".to_string(),
            },
            ComponentType::Image => ComponentContent::Image {
                src: String::new(),
                alt: String::new(),
                width: None,
                height: None,
            },
            ComponentType::Video => ComponentContent::Video {
                src: String::new(),
                autoplay: false,
                controls: true,
            },
            ComponentType::Gallery => ComponentContent::Gallery { images: Vec::new() },
            ComponentType::Quote => ComponentContent::Quote {
                text: "Quote".to_string(),
                attribution: None,
            },
            ComponentType::List => ComponentContent::List {
                items: vec!["Item 1".to_string(), "Item 2".to_string(), "Item 3".to_string()],
                ordered: false,
            },
            ComponentType::Divider => ComponentContent::Divider {
                style: default_divider_style(),
                color: None,
            },
            ComponentType::Spacer => ComponentContent::Spacer { height: 40 },
            ComponentType::Card => ComponentContent::Card {
                title: "Card Title".to_string(),
                body: "Card content goes here.".to_string(),
                image: None,
            },
            ComponentType::Button => ComponentContent::Button {
                label: "Click me".to_string(),
                href: None,
                variant: None,
            },
            ComponentType::CallToAction => ComponentContent::CallToAction {
                heading: "Call to Action".to_string(),
                text: "Take action now.".to_string(),
                button_text: "Get Started".to_string(),
                button_href: None,
            },
            ComponentType::Form => ComponentContent::Form {
                fields: vec![FormField {
                    name: "email".to_string(),
                    label: "Email".to_string(),
                    kind: FormFieldKind::Email,
                    required: true,
                    options: Vec::new(),
                }],
                submit_label: "Submit".to_string(),
            },
            ComponentType::Map => ComponentContent::Map {
                address: String::new(),
                zoom: default_zoom(),
            },
            ComponentType::Accordion => ComponentContent::Accordion { items: Vec::new() },
            ComponentType::Tabs => ComponentContent::Tabs { tabs: Vec::new() },
            ComponentType::Testimonial => ComponentContent::Testimonial {
                quote: String::new(),
                author: String::new(),
                role: None,
            },
            ComponentType::PricingTable => ComponentContent::PricingTable { plans: Vec::new() },
            ComponentType::Container => ComponentContent::Container { gap: None },
            ComponentType::Custom => ComponentContent::Custom {
                kind: "custom".to_string(),
                props: serde_json::Value::Null,
            },
        }
    }

    /// Checks field-level constraints that serde cannot express.
    pub fn check(&self) -> Result<(), String> {
        match self {
            ComponentContent::Heading { level, .. } if !(1..=6).contains(level) => {
                Err(format!("heading level must be between 1 and 6, got {level}"))
            }
            ComponentContent::Map { zoom, .. } if *zoom > 21 => {
                Err(format!("map zoom must be at most 21, got {zoom}"))
            }
            ComponentContent::Form { fields, .. } => {
                let mut seen = std::collections::HashSet::new();
                for field in fields {
                    if !seen.insert(field.name.as_str()) {
                        return Err(format!("duplicate form field name: {}", field.name));
                    }
                }
                Ok(())
            }
            ComponentContent::Custom { kind, .. } if kind.trim().is_empty() => {
                Err("custom component kind must not be empty".to_string())
            }
            _ => Ok(()),
        }
    }
}
