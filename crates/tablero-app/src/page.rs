// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::ids::NodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tag {
    Div,
    Table,
    TableBody,
    TableRow,
    Button,
    Input,
    Anchor,
    Span,
    Icon,
}

impl Tag {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Div => "div",
            Self::Table => "table",
            Self::TableBody => "tbody",
            Self::TableRow => "tr",
            Self::Button => "button",
            Self::Input => "input",
            Self::Anchor => "a",
            Self::Span => "span",
            Self::Icon => "i",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "div" => Some(Self::Div),
            "table" => Some(Self::Table),
            "tbody" => Some(Self::TableBody),
            "tr" => Some(Self::TableRow),
            "button" => Some(Self::Button),
            "input" => Some(Self::Input),
            "a" => Some(Self::Anchor),
            "span" => Some(Self::Span),
            "i" => Some(Self::Icon),
            _ => None,
        }
    }
}

/// Layout box in logical pixels, as the surrounding template measured it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationName {
    FadeIn,
    Ripple,
}

impl AnimationName {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FadeIn => "fadeIn",
            Self::Ripple => "ripple",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animation {
    pub name: AnimationName,
    pub delay_ms: u64,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRule {
    pub name: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSheet {
    rules: Vec<StyleRule>,
}

impl StyleSheet {
    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.name == name)
    }

    pub fn push_rule(&mut self, name: impl Into<String>, body: impl Into<String>) {
        self.rules.push(StyleRule {
            name: name.into(),
            body: body.into(),
        });
    }

    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub tag: Tag,
    pub element_id: Option<String>,
    classes: BTreeSet<String>,
    attrs: BTreeMap<String, String>,
    pub text: String,
    pub rect: Option<Rect>,
    pub animation: Option<Animation>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
}

impl Node {
    fn new(tag: Tag) -> Self {
        Self {
            tag,
            element_id: None,
            classes: BTreeSet::new(),
            attrs: BTreeMap::new(),
            text: String::new(),
            rect: None,
            animation: None,
            children: Vec::new(),
            parent: None,
        }
    }
}

/// An explicit element tree standing in for the rendered document. Nodes live
/// in an arena and stay allocated after detachment; pages are small and
/// rebuilt wholesale on reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    nodes: Vec<Node>,
    root: NodeId,
    pub stylesheet: StyleSheet,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    pub fn new() -> Self {
        let root = Node::new(Tag::Div);
        Self {
            nodes: vec![root],
            root: NodeId::new(0),
            stylesheet: StyleSheet::default(),
        }
    }

    pub const fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.get()]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.get()]
    }

    pub fn create(&mut self, tag: Tag) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(tag));
        id
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.get()].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.get()].children
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.get()].parent = Some(parent);
        self.nodes[parent.get()].children.push(child);
    }

    /// Inserts `new` into the reference node's parent, immediately before the
    /// reference, preserving the order of all other siblings. No-op when the
    /// reference is the root.
    pub fn insert_before(&mut self, new: NodeId, reference: NodeId) {
        let Some(parent) = self.nodes[reference.get()].parent else {
            return;
        };
        self.detach(new);
        let position = self.nodes[parent.get()]
            .children
            .iter()
            .position(|id| *id == reference)
            .unwrap_or(self.nodes[parent.get()].children.len());
        self.nodes[parent.get()].children.insert(position, new);
        self.nodes[new.get()].parent = Some(parent);
    }

    /// Detaches the node from its parent. The arena slot is not reclaimed.
    pub fn remove(&mut self, id: NodeId) {
        self.detach(id);
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.get()].parent.take() {
            self.nodes[parent.get()].children.retain(|child| *child != id);
        }
    }

    /// Whether the id names a live node reachable from a parent (or the root
    /// itself). Ids from a page that has since been replaced may index past
    /// this arena; those report detached rather than panicking, so stale
    /// host-scheduled removals stay silent.
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root
            || self
                .nodes
                .get(id.get())
                .is_some_and(|node| node.parent.is_some())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.nodes[id.get()].classes.contains(class)
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) {
        self.nodes[id.get()].classes.insert(class.to_owned());
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) {
        self.nodes[id.get()].classes.remove(class);
    }

    /// Flips the class and reports whether it is present afterwards.
    pub fn toggle_class(&mut self, id: NodeId, class: &str) -> bool {
        if self.has_class(id, class) {
            self.remove_class(id, class);
            false
        } else {
            self.add_class(id, class);
            true
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id.get()].attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        self.nodes[id.get()]
            .attrs
            .insert(name.to_owned(), value.into());
    }

    /// Reachable nodes in document (pre-)order.
    pub fn walk(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            order.push(id);
            for child in self.nodes[id.get()].children.iter().rev() {
                stack.push(*child);
            }
        }
        order
    }

    pub fn by_id(&self, element_id: &str) -> Option<NodeId> {
        self.walk()
            .into_iter()
            .find(|id| self.nodes[id.get()].element_id.as_deref() == Some(element_id))
    }

    pub fn all_by_class(&self, class: &str) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|id| self.has_class(*id, class))
            .collect()
    }

    pub fn all_by_tag(&self, tag: Tag) -> Vec<NodeId> {
        self.walk()
            .into_iter()
            .filter(|id| self.nodes[id.get()].tag == tag)
            .collect()
    }

    pub fn first_by_class(&self, class: &str) -> Option<NodeId> {
        self.walk()
            .into_iter()
            .find(|id| self.has_class(*id, class))
    }

    /// Nearest ancestor-or-self carrying the class.
    pub fn closest_with_class(&self, id: NodeId, class: &str) -> Option<NodeId> {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if self.has_class(current, class) {
                return Some(current);
            }
            cursor = self.nodes[current.get()].parent;
        }
        None
    }

    /// First descendant with the given tag, in document order.
    pub fn descendant_by_tag(&self, id: NodeId, tag: Tag) -> Option<NodeId> {
        self.descendants(id)
            .into_iter()
            .find(|node| self.nodes[node.get()].tag == tag)
    }

    pub fn descendant_by_class(&self, id: NodeId, class: &str) -> Option<NodeId> {
        self.descendants(id)
            .into_iter()
            .find(|node| self.has_class(*node, class))
    }

    fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[id.get()].children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            order.push(current);
            for child in self.nodes[current.get()].children.iter().rev() {
                stack.push(*child);
            }
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::{Page, Tag};
    use crate::ids::NodeId;

    #[test]
    fn insert_before_preserves_sibling_order() {
        let mut page = Page::new();
        let root = page.root();
        let first = page.create(Tag::Div);
        let second = page.create(Tag::Table);
        let third = page.create(Tag::Div);
        page.append_child(root, first);
        page.append_child(root, second);
        page.append_child(root, third);

        let wrapper = page.create(Tag::Div);
        page.insert_before(wrapper, second);

        assert_eq!(page.children(root), &[first, wrapper, second, third]);

        page.append_child(wrapper, second);
        assert_eq!(page.children(root), &[first, wrapper, third]);
        assert_eq!(page.children(wrapper), &[second]);
        assert_eq!(page.parent(second), Some(wrapper));
    }

    #[test]
    fn toggle_class_reports_resulting_state() {
        let mut page = Page::new();
        let node = page.create(Tag::Div);
        page.append_child(page.root(), node);

        assert!(page.toggle_class(node, "collapsed"));
        assert!(page.has_class(node, "collapsed"));
        assert!(!page.toggle_class(node, "collapsed"));
        assert!(!page.has_class(node, "collapsed"));
    }

    #[test]
    fn removed_nodes_leave_document_order() {
        let mut page = Page::new();
        let node = page.create(Tag::Span);
        page.append_child(page.root(), node);
        page.add_class(node, "ripple");

        assert_eq!(page.all_by_class("ripple"), vec![node]);
        page.remove(node);
        assert!(page.all_by_class("ripple").is_empty());
        assert!(!page.is_attached(node));
    }

    #[test]
    fn ids_past_the_arena_read_as_detached() {
        let page = Page::new();
        assert!(page.is_attached(page.root()));
        assert!(!page.is_attached(NodeId::new(page.root().get() + 1)));
        assert!(!page.is_attached(NodeId::new(usize::MAX)));
    }

    #[test]
    fn closest_with_class_walks_ancestors() {
        let mut page = Page::new();
        let category = page.create(Tag::Div);
        let item = page.create(Tag::Div);
        let anchor = page.create(Tag::Anchor);
        page.append_child(page.root(), category);
        page.append_child(category, item);
        page.append_child(item, anchor);
        page.add_class(category, "menu-category");

        assert_eq!(
            page.closest_with_class(anchor, "menu-category"),
            Some(category)
        );
        assert_eq!(page.closest_with_class(anchor, "missing"), None);
    }
}
