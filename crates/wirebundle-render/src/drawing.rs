//! Part drawings: SVG documents that can be composed side by side on one canvas.
//!
//! Every loaded drawing gets a unique prefix. Its ids and class names are rewritten with that
//! prefix (including references from `href`, `url(#..)` and `<style>` selectors), so two
//! drawings that both define `.cls-1` no longer style each other once they share a document.
//! Editor-private `inkscape:*`/`sodipodi:*` markup is dropped on load.

use crate::error::{Error, Result};
use crate::svg::escape_xml;
use indexmap::IndexMap;
use regex::Regex;
use rustc_hash::FxHashMap;
use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use wirebundle_core::geom::{Size, size};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

static DRAWING_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn unique_prefix() -> String {
    let n = DRAWING_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("d{n}")
}

#[derive(Debug, Clone)]
enum SvgNode {
    Element(SvgElement),
    Text(String),
}

#[derive(Debug, Clone)]
struct SvgElement {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<SvgNode>,
}

#[derive(Debug, Clone)]
pub struct Drawing {
    name: String,
    prefix: String,
    size: Size,
    root: SvgElement,
    ids: FxHashMap<String, String>,
    classes: FxHashMap<String, String>,
    /// Selector → property → value; emitted as `!important` declarations.
    style_overrides: IndexMap<String, IndexMap<String, String>>,
}

impl Drawing {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::DrawingIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text, path.display().to_string())
    }

    /// Parses SVG text; `name` is only used in error messages and logs.
    pub fn parse(text: &str, name: impl Into<String>) -> Result<Self> {
        Self::parse_with_prefix(text, name, unique_prefix())
    }

    pub fn parse_with_prefix(
        text: &str,
        name: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Result<Self> {
        let name = name.into();
        let prefix = prefix.into();
        let opts = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, opts).map_err(|e| Error::Xml {
            drawing: name.clone(),
            message: e.to_string(),
        })?;

        let node = doc.root_element();
        if node.tag_name().name() != "svg" {
            return Err(Error::Xml {
                drawing: name,
                message: format!("root element is <{}>, expected <svg>", node.tag_name().name()),
            });
        }

        let size = read_size(node, &name)?;
        let mut root = build_element(node);

        let mut ids = FxHashMap::default();
        let mut classes = FxHashMap::default();
        collect_names(&root, &prefix, &mut ids, &mut classes);
        rewrite_element(&mut root, &ids, &classes);

        tracing::debug!(
            drawing = %name,
            prefix = %prefix,
            ids = ids.len(),
            classes = classes.len(),
            "loaded drawing"
        );

        Ok(Self {
            name,
            prefix,
            size,
            root,
            ids,
            classes,
            style_overrides: IndexMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> f64 {
        self.size.width
    }

    pub fn height(&self) -> f64 {
        self.size.height
    }

    /// The id `original` was rewritten to, if the drawing defines it.
    pub fn mapped_id(&self, original: &str) -> Option<&str> {
        self.ids.get(original).map(String::as_str)
    }

    pub fn mapped_class(&self, original: &str) -> Option<&str> {
        self.classes.get(original).map(String::as_str)
    }

    /// Forces `property: value` on everything matching `selector`. `.class` and `#id`
    /// selectors are written in terms of the drawing's original names.
    pub fn override_style(
        &mut self,
        selector: &str,
        property: impl Into<String>,
        value: impl Into<String>,
    ) {
        let selector = self.map_selector(selector);
        self.style_overrides
            .entry(selector)
            .or_default()
            .insert(property.into(), value.into());
    }

    pub fn style_overrides(&self) -> &IndexMap<String, IndexMap<String, String>> {
        &self.style_overrides
    }

    fn map_selector(&self, selector: &str) -> String {
        rewrite_style_text(selector, &self.ids, &self.classes)
    }

    /// Serializes the drawing as a nested `<svg>` element.
    pub fn write_svg(&self, out: &mut String) {
        let extra = self.overrides_css().map(|css| {
            SvgNode::Element(SvgElement {
                name: "style".to_string(),
                attrs: vec![("id".to_string(), format!("{}_overrides", self.prefix))],
                children: vec![SvgNode::Text(css)],
            })
        });
        write_element(&self.root, extra.as_ref(), out);
    }

    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        self.write_svg(&mut out);
        out
    }

    fn overrides_css(&self) -> Option<String> {
        if self.style_overrides.is_empty() {
            return None;
        }
        let mut css = String::new();
        for (selector, props) in &self.style_overrides {
            let _ = write!(&mut css, "{selector}{{");
            for (prop, value) in props {
                let _ = write!(&mut css, "{prop}:{value} !important;");
            }
            css.push('}');
        }
        Some(css)
    }
}

fn read_size(node: roxmltree::Node<'_, '_>, name: &str) -> Result<Size> {
    let view_box = node
        .attribute("viewBox")
        .and_then(|v| svgtypes::ViewBox::from_str(v).ok());
    let width = node
        .attribute("width")
        .and_then(length_to_px)
        .or(view_box.as_ref().map(|vb| vb.w))
        .ok_or_else(|| Error::MissingDimension {
            drawing: name.to_string(),
            dimension: "width",
        })?;
    let height = node
        .attribute("height")
        .and_then(length_to_px)
        .or(view_box.as_ref().map(|vb| vb.h))
        .ok_or_else(|| Error::MissingDimension {
            drawing: name.to_string(),
            dimension: "height",
        })?;
    Ok(size(width, height))
}

/// Absolute lengths in user units; relative units have no meaning outside a viewport.
fn length_to_px(value: &str) -> Option<f64> {
    use svgtypes::LengthUnit;
    let length = svgtypes::Length::from_str(value).ok()?;
    let factor = match length.unit {
        LengthUnit::None | LengthUnit::Px => 1.0,
        LengthUnit::In => 96.0,
        LengthUnit::Cm => 96.0 / 2.54,
        LengthUnit::Mm => 96.0 / 25.4,
        LengthUnit::Pt => 4.0 / 3.0,
        LengthUnit::Pc => 16.0,
        _ => return None,
    };
    Some(length.number * factor).filter(|v| v.is_finite() && *v >= 0.0)
}

fn is_editor_namespace(uri: &str) -> bool {
    uri.contains("inkscape.org") || uri.contains("sodipodi")
}

fn qualified_name(
    node: roxmltree::Node<'_, '_>,
    namespace: Option<&str>,
    local: &str,
) -> Option<String> {
    match namespace {
        None | Some(SVG_NS) => Some(local.to_string()),
        Some(uri) if is_editor_namespace(uri) => None,
        Some(XML_NS) => Some(format!("xml:{local}")),
        Some(uri) => match node.lookup_prefix(uri) {
            Some(prefix) if !prefix.is_empty() => Some(format!("{prefix}:{local}")),
            _ => Some(local.to_string()),
        },
    }
}

/// `xmlns` declarations that come into scope at `node`. roxmltree reports every in-scope
/// namespace on every element, so a binding is emitted only where it first appears.
fn introduced_namespaces(node: roxmltree::Node<'_, '_>) -> Vec<(String, String)> {
    let parent = node.parent_element();
    node.namespaces()
        .filter(|ns| ns.name() != Some("xml") && !is_editor_namespace(ns.uri()))
        .filter(|ns| {
            parent.is_none_or(|p| {
                !p.namespaces()
                    .any(|q| q.name() == ns.name() && q.uri() == ns.uri())
            })
        })
        .map(|ns| match ns.name() {
            Some(p) => (format!("xmlns:{p}"), ns.uri().to_string()),
            None => ("xmlns".to_string(), ns.uri().to_string()),
        })
        .collect()
}

fn build_element(node: roxmltree::Node<'_, '_>) -> SvgElement {
    let tag = node.tag_name();
    let name = qualified_name(node, tag.namespace(), tag.name())
        .unwrap_or_else(|| tag.name().to_string());

    let mut attrs = introduced_namespaces(node);
    attrs.extend(node.attributes().filter_map(|a| {
        let key = qualified_name(node, a.namespace(), a.name())?;
        Some((key, a.value().to_string()))
    }));

    let keeps_whitespace = matches!(tag.name(), "text" | "tspan" | "textPath");
    let mut children = Vec::new();
    for child in node.children() {
        if child.is_element() {
            let ns = child.tag_name().namespace();
            if ns.is_some_and(is_editor_namespace) {
                continue;
            }
            children.push(SvgNode::Element(build_element(child)));
        } else if let Some(text) = child.text().filter(|_| child.is_text()) {
            if keeps_whitespace || !text.trim().is_empty() {
                children.push(SvgNode::Text(text.to_string()));
            }
        }
    }

    SvgElement {
        name,
        attrs,
        children,
    }
}

fn collect_names(
    el: &SvgElement,
    prefix: &str,
    ids: &mut FxHashMap<String, String>,
    classes: &mut FxHashMap<String, String>,
) {
    for (key, value) in &el.attrs {
        match key.as_str() {
            "id" if !value.is_empty() => {
                ids.entry(value.clone())
                    .or_insert_with(|| format!("{prefix}_{value}"));
            }
            "class" => {
                for token in value.split_whitespace() {
                    classes
                        .entry(token.to_string())
                        .or_insert_with(|| format!("{prefix}_{token}"));
                }
            }
            _ => {}
        }
    }
    for child in &el.children {
        if let SvgNode::Element(child) = child {
            collect_names(child, prefix, ids, classes);
        }
    }
}

fn rewrite_element(
    el: &mut SvgElement,
    ids: &FxHashMap<String, String>,
    classes: &FxHashMap<String, String>,
) {
    for (key, value) in el.attrs.iter_mut() {
        match key.as_str() {
            "id" => {
                if let Some(mapped) = ids.get(value.as_str()) {
                    *value = mapped.clone();
                }
            }
            "class" => {
                *value = value
                    .split_whitespace()
                    .map(|t| classes.get(t).map_or(t, String::as_str))
                    .collect::<Vec<_>>()
                    .join(" ");
            }
            "href" | "xlink:href" => {
                if let Some(mapped) = value.strip_prefix('#').and_then(|id| ids.get(id)) {
                    *value = format!("#{mapped}");
                }
            }
            _ if value.contains("url(") => {
                *value = rewrite_url_refs(value, ids);
            }
            _ => {}
        }
    }

    let is_style = el.name == "style";
    for child in el.children.iter_mut() {
        match child {
            SvgNode::Element(child) => rewrite_element(child, ids, classes),
            SvgNode::Text(text) if is_style => *text = rewrite_style_text(text, ids, classes),
            SvgNode::Text(_) => {}
        }
    }
}

fn re_url_ref() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| Regex::new(r"url\(\s*#([^)\s'\x22]+)\s*\)").unwrap())
}

fn re_selector_name() -> &'static Regex {
    static ONCE: OnceLock<Regex> = OnceLock::new();
    ONCE.get_or_init(|| Regex::new(r"([.#])(-?[_a-zA-Z][_a-zA-Z0-9-]*)").unwrap())
}

fn rewrite_url_refs(value: &str, ids: &FxHashMap<String, String>) -> String {
    re_url_ref()
        .replace_all(value, |caps: &regex::Captures<'_>| {
            let id = &caps[1];
            match ids.get(id) {
                Some(mapped) => format!("url(#{mapped})"),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Rewrites `.class` and `#id` tokens that name something defined in this drawing; anything
/// else (hex colours, foreign ids) is left as is.
fn rewrite_style_text(
    css: &str,
    ids: &FxHashMap<String, String>,
    classes: &FxHashMap<String, String>,
) -> String {
    re_selector_name()
        .replace_all(css, |caps: &regex::Captures<'_>| {
            let sigil = &caps[1];
            let name = &caps[2];
            let table = if sigil == "." { classes } else { ids };
            match table.get(name) {
                Some(mapped) => format!("{sigil}{mapped}"),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn write_element(el: &SvgElement, extra: Option<&SvgNode>, out: &mut String) {
    let _ = write!(out, "<{}", el.name);
    for (key, value) in &el.attrs {
        let _ = write!(out, r#" {key}="{}""#, escape_xml(value));
    }
    if el.children.is_empty() && extra.is_none() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    for child in el.children.iter().chain(extra) {
        match child {
            SvgNode::Element(child) => write_element(child, None, out),
            SvgNode::Text(text) => out.push_str(&escape_xml(text)),
        }
    }
    let _ = write!(out, "</{}>", el.name);
}
