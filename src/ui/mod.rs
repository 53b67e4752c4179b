mod draw;
pub mod marquee;
pub mod marquee_widget;
pub mod schedule;
pub mod substitute;
mod theme;
mod widget;

pub use draw::{DrawList, FontFamily, PanelCommand, TextCommand};
pub use marquee::{MarqueeConfig, MarqueeController, Phase, ScrollState};
pub use marquee_widget::{
    Attachment, Construction, InheritedMetrics, MarqueeId, MarqueeSet, MarqueeWidget,
};
pub use schedule::{DEFAULT_TICK_INTERVAL, Scheduler, TaskId};
pub use substitute::substitute_labels;
pub use theme::Theme;
pub use widget::{CrossAlign, Widget};

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

new_key_type! {
    /// Handle into the widget arena. Stable across insertions/removals.
    pub struct WidgetId;
}

/// Approximate glyph advance as a fraction of the font size.
pub const GLYPH_WIDTH_RATIO: f32 = 0.6;

/// Approximate single-line width of `text` at `font_size`.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * GLYPH_WIDTH_RATIO
}

// ---------------------------------------------------------------------------
// Geometry primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// Overlap of two rects; zero-sized when they are disjoint.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = (self.y + self.height).min(other.y + other.height);
        Rect {
            x,
            y,
            width: (right - x).max(0.0),
            height: (bottom - y).max(0.0),
        }
    }

    fn shifted(&self, dx: f32) -> Rect {
        Rect {
            x: self.x + dx,
            ..*self
        }
    }
}

/// Padding / margin edges (top, right, bottom, left — CSS order).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub fn all(v: f32) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

// ---------------------------------------------------------------------------
// Positioning mode
// ---------------------------------------------------------------------------

/// How a widget is positioned within its parent.
/// Ignored for children of Row/Column, which place children themselves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// Fixed pixel offset from parent's content origin.
    Fixed { x: f32, y: f32 },
    /// Percentage of parent's content area (0.0–1.0).
    Percent { x: f32, y: f32 },
}

impl Default for Position {
    fn default() -> Self {
        Position::Fixed { x: 0.0, y: 0.0 }
    }
}

/// How a widget's width/height is determined.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Sizing {
    /// Fixed pixel size.
    Fixed(f32),
    /// Percentage of parent's content dimension (0.0–1.0).
    Percent(f32),
    /// Fit to content (intrinsic size from measure).
    #[default]
    Fit,
}

// ---------------------------------------------------------------------------
// Widget node (arena entry)
// ---------------------------------------------------------------------------

/// Arena entry pairing a widget with tree/layout metadata.
pub struct WidgetNode {
    pub widget: Widget,
    pub parent: Option<WidgetId>,
    pub children: Vec<WidgetId>,
    pub position: Position,
    pub width: Sizing,
    pub height: Sizing,
    pub padding: Edges,
    pub margin: Edges,
    pub dirty: bool,
    /// Element name, unique by convention (used by lookups and markup).
    pub name: Option<String>,
    /// Style classes.
    pub classes: SmallVec<[String; 4]>,
    /// Horizontal translation applied at draw time to this node and its
    /// descendants. Never affects layout.
    pub offset_x: f32,
    /// Computed layout rect (set by layout pass). Zero while detached.
    pub rect: Rect,
    /// Measured intrinsic size (set by measure pass).
    pub measured: Size,
}

impl WidgetNode {
    fn new(widget: Widget, parent: Option<WidgetId>) -> Self {
        Self {
            widget,
            parent,
            children: Vec::new(),
            position: Position::default(),
            width: Sizing::default(),
            height: Sizing::default(),
            padding: Edges::ZERO,
            margin: Edges::ZERO,
            dirty: true,
            name: None,
            classes: SmallVec::new(),
            offset_x: 0.0,
            rect: Rect::default(),
            measured: Size::default(),
        }
    }

    /// Width available to children (rect minus horizontal padding).
    pub fn content_width(&self) -> f32 {
        (self.rect.width - self.padding.horizontal()).max(0.0)
    }
}

/// Where a node sits: index among the roots or among a parent's children.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    Root(usize),
    Child(WidgetId, usize),
}

/// How a container places its children.
#[derive(Clone, Copy)]
enum Flow {
    Stack,
    Row(f32, CrossAlign),
    Column(f32, CrossAlign),
}

// ---------------------------------------------------------------------------
// WidgetTree
// ---------------------------------------------------------------------------

/// Arena-backed retained widget tree.
///
/// Nodes can exist detached (no parent, not a root). Layout only visits
/// attached subtrees; every node whose rect changed during a layout pass is
/// queued as a geometry change for the host to drain.
pub struct WidgetTree {
    arena: SlotMap<WidgetId, WidgetNode>,
    roots: Vec<WidgetId>,
    geometry_changed: Vec<WidgetId>,
}

impl WidgetTree {
    pub fn new() -> Self {
        Self {
            arena: SlotMap::with_key(),
            roots: Vec::new(),
            geometry_changed: Vec::new(),
        }
    }

    /// Insert a widget as a root (no parent).
    pub fn insert_root(&mut self, widget: Widget) -> WidgetId {
        let id = self.arena.insert(WidgetNode::new(widget, None));
        self.roots.push(id);
        id
    }

    /// Insert a widget as the last child of `parent`. Returns the new widget's id.
    pub fn insert(&mut self, parent: WidgetId, widget: Widget) -> WidgetId {
        let id = self.arena.insert(WidgetNode::new(widget, Some(parent)));
        if let Some(parent_node) = self.arena.get_mut(parent) {
            parent_node.children.push(id);
            parent_node.dirty = true;
        }
        id
    }

    /// Create a widget that is not yet part of the tree.
    /// Attach it later with `attach_at` / `attach_root`.
    pub fn insert_detached(&mut self, widget: Widget) -> WidgetId {
        self.arena.insert(WidgetNode::new(widget, None))
    }

    /// Attach a detached node as child `index` of `parent` (clamped to the
    /// child count). Fails if `child` is attached, missing, or an ancestor
    /// of `parent`.
    pub fn attach_at(&mut self, parent: WidgetId, index: usize, child: WidgetId) -> bool {
        if !self.arena.contains_key(parent)
            || !self.arena.contains_key(child)
            || self.is_attached(child)
            || self.is_ancestor_or_self(child, parent)
        {
            return false;
        }
        if let Some(parent_node) = self.arena.get_mut(parent) {
            let index = index.min(parent_node.children.len());
            parent_node.children.insert(index, child);
            parent_node.dirty = true;
        }
        if let Some(node) = self.arena.get_mut(child) {
            node.parent = Some(parent);
            node.dirty = true;
        }
        true
    }

    /// Attach a detached node as the last root.
    pub fn attach_root(&mut self, child: WidgetId) -> bool {
        if !self.arena.contains_key(child) || self.is_attached(child) {
            return false;
        }
        self.roots.push(child);
        self.mark_dirty(child);
        true
    }

    /// Unlink a node (and its subtree) from the tree without deleting it.
    /// Detached nodes have no resolved geometry: their rects reset to zero.
    pub fn detach(&mut self, id: WidgetId) -> bool {
        let Some(slot) = self.slot_of(id) else {
            return false;
        };
        match slot {
            Slot::Root(i) => {
                self.roots.remove(i);
            }
            Slot::Child(parent, i) => {
                if let Some(parent_node) = self.arena.get_mut(parent) {
                    parent_node.children.remove(i);
                }
                self.mark_dirty(parent);
            }
        }

        let mut subtree = Vec::new();
        Self::collect_subtree(&self.arena, id, &mut subtree);
        for nid in subtree {
            if let Some(node) = self.arena.get_mut(nid) {
                node.rect = Rect::default();
                node.dirty = true;
            }
        }
        if let Some(node) = self.arena.get_mut(id) {
            node.parent = None;
        }
        true
    }

    /// Put detached `container` in `id`'s slot and move `id` inside it as
    /// its last child. Returns false if `id` is not attached or `container`
    /// is unusable.
    pub fn wrap(&mut self, id: WidgetId, container: WidgetId) -> bool {
        if id == container
            || !self.arena.contains_key(container)
            || self.is_attached(container)
            || self.is_ancestor_or_self(id, container)
        {
            return false;
        }
        let Some(slot) = self.slot_of(id) else {
            return false;
        };

        let container_parent = match slot {
            Slot::Root(i) => {
                self.roots[i] = container;
                None
            }
            Slot::Child(parent, i) => {
                if let Some(parent_node) = self.arena.get_mut(parent) {
                    parent_node.children[i] = container;
                    parent_node.dirty = true;
                }
                Some(parent)
            }
        };
        if let Some(node) = self.arena.get_mut(container) {
            node.parent = container_parent;
            node.children.push(id);
            node.dirty = true;
        }
        if let Some(node) = self.arena.get_mut(id) {
            node.parent = Some(container);
            node.dirty = true;
        }
        true
    }

    /// Remove a widget and all its descendants.
    pub fn remove(&mut self, id: WidgetId) {
        // Collect descendants depth-first.
        let mut to_remove = Vec::new();
        Self::collect_subtree(&self.arena, id, &mut to_remove);

        // Unlink from parent.
        if let Some(node) = self.arena.get(id)
            && let Some(parent_id) = node.parent
            && let Some(parent) = self.arena.get_mut(parent_id)
        {
            parent.children.retain(|c| *c != id);
            parent.dirty = true;
        }

        // Remove from roots if present.
        self.roots.retain(|r| *r != id);

        // Remove all nodes.
        for rid in to_remove {
            self.arena.remove(rid);
        }
    }

    fn collect_subtree(
        arena: &SlotMap<WidgetId, WidgetNode>,
        id: WidgetId,
        out: &mut Vec<WidgetId>,
    ) {
        out.push(id);
        if let Some(node) = arena.get(id) {
            for &child in &node.children {
                Self::collect_subtree(arena, child, out);
            }
        }
    }

    fn slot_of(&self, id: WidgetId) -> Option<Slot> {
        let node = self.arena.get(id)?;
        match node.parent {
            Some(parent) => {
                let index = self
                    .arena
                    .get(parent)?
                    .children
                    .iter()
                    .position(|c| *c == id)?;
                Some(Slot::Child(parent, index))
            }
            None => self
                .roots
                .iter()
                .position(|r| *r == id)
                .map(Slot::Root),
        }
    }

    fn is_ancestor_or_self(&self, ancestor: WidgetId, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(cid) = current {
            if cid == ancestor {
                return true;
            }
            current = self.arena.get(cid).and_then(|n| n.parent);
        }
        false
    }

    /// Get a reference to a widget node.
    pub fn get(&self, id: WidgetId) -> Option<&WidgetNode> {
        self.arena.get(id)
    }

    /// Get a mutable reference to a widget node.
    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut WidgetNode> {
        self.arena.get_mut(id)
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.arena.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.arena.get(id)?.parent
    }

    /// Children of a node; empty if the node does not exist.
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.arena
            .get(id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// True if the node has a parent or is a root.
    pub fn is_attached(&self, id: WidgetId) -> bool {
        match self.arena.get(id) {
            Some(node) => node.parent.is_some() || self.roots.contains(&id),
            None => false,
        }
    }

    /// True if following parents from `id` ends at a root, i.e. the node is
    /// part of the laid-out tree. A node under a detached ancestor is not.
    pub fn is_in_tree(&self, id: WidgetId) -> bool {
        let mut current = id;
        loop {
            match self.arena.get(current) {
                Some(node) => match node.parent {
                    Some(parent) => current = parent,
                    None => return self.roots.contains(&current),
                },
                None => return false,
            }
        }
    }

    /// Position of a node among its siblings (or among the roots).
    pub fn index_of(&self, id: WidgetId) -> Option<usize> {
        match self.slot_of(id)? {
            Slot::Root(i) | Slot::Child(_, i) => Some(i),
        }
    }

    /// Find the first node with `name`, depth-first from the roots.
    pub fn find_by_name(&self, name: &str) -> Option<WidgetId> {
        let mut stack: Vec<WidgetId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let Some(node) = self.arena.get(id) else {
                continue;
            };
            if node.name.as_deref() == Some(name) {
                return Some(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        None
    }

    /// Set position mode for a widget.
    pub fn set_position(&mut self, id: WidgetId, pos: Position) {
        if let Some(node) = self.arena.get_mut(id) {
            node.position = pos;
            node.dirty = true;
        }
    }

    /// Set sizing for a widget.
    pub fn set_sizing(&mut self, id: WidgetId, w: Sizing, h: Sizing) {
        if let Some(node) = self.arena.get_mut(id) {
            node.width = w;
            node.height = h;
            node.dirty = true;
        }
    }

    /// Set padding for a widget.
    pub fn set_padding(&mut self, id: WidgetId, padding: Edges) {
        if let Some(node) = self.arena.get_mut(id) {
            node.padding = padding;
            node.dirty = true;
        }
    }

    /// Set margin for a widget.
    pub fn set_margin(&mut self, id: WidgetId, margin: Edges) {
        if let Some(node) = self.arena.get_mut(id) {
            node.margin = margin;
            node.dirty = true;
        }
    }

    pub fn set_name(&mut self, id: WidgetId, name: Option<String>) {
        if let Some(node) = self.arena.get_mut(id) {
            node.name = name;
        }
    }

    /// Add a style class (no duplicates).
    pub fn add_class(&mut self, id: WidgetId, class: &str) {
        if let Some(node) = self.arena.get_mut(id)
            && !node.classes.iter().any(|c| c == class)
        {
            node.classes.push(class.to_string());
        }
    }

    pub fn has_class(&self, id: WidgetId, class: &str) -> bool {
        self.arena
            .get(id)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    /// Label text, if the node is a label.
    pub fn text(&self, id: WidgetId) -> Option<&str> {
        match &self.arena.get(id)?.widget {
            Widget::Label { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Replace a label's text. Returns false if the node is not a label.
    pub fn set_text(&mut self, id: WidgetId, value: &str) -> bool {
        let Some(node) = self.arena.get_mut(id) else {
            return false;
        };
        let Widget::Label { text, .. } = &mut node.widget else {
            return false;
        };
        if text.as_str() != value {
            *text = value.to_string();
            self.mark_dirty(id);
        }
        true
    }

    pub fn font_size(&self, id: WidgetId) -> Option<f32> {
        match &self.arena.get(id)?.widget {
            Widget::Label { font_size, .. } => Some(*font_size),
            _ => None,
        }
    }

    pub fn set_font_size(&mut self, id: WidgetId, size: f32) -> bool {
        let Some(node) = self.arena.get_mut(id) else {
            return false;
        };
        let Widget::Label { font_size, .. } = &mut node.widget else {
            return false;
        };
        *font_size = size;
        self.mark_dirty(id);
        true
    }

    /// Set the draw-time horizontal translation. Does not dirty layout.
    pub fn set_offset_x(&mut self, id: WidgetId, offset: f32) {
        if let Some(node) = self.arena.get_mut(id) {
            node.offset_x = offset;
        }
    }

    pub fn offset_x(&self, id: WidgetId) -> Option<f32> {
        self.arena.get(id).map(|n| n.offset_x)
    }

    /// Mark a widget and its ancestors as dirty.
    pub fn mark_dirty(&mut self, id: WidgetId) {
        let mut current = Some(id);
        while let Some(cid) = current {
            if let Some(node) = self.arena.get_mut(cid) {
                node.dirty = true;
                current = node.parent;
            } else {
                break;
            }
        }
    }

    /// Root widget ids.
    pub fn roots(&self) -> &[WidgetId] {
        &self.roots
    }

    /// Drain the nodes whose rect changed since the last call.
    pub fn take_geometry_changes(&mut self) -> Vec<WidgetId> {
        std::mem::take(&mut self.geometry_changed)
    }

    // ------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------

    /// Run the full layout pass over the tree. `screen` is the available area.
    pub fn layout(&mut self, screen: Size) {
        let root_ids: Vec<WidgetId> = self.roots.clone();
        let area = Rect {
            x: 0.0,
            y: 0.0,
            width: screen.width,
            height: screen.height,
        };
        for root in root_ids {
            self.layout_node(root, area);
        }
    }

    fn layout_node(&mut self, id: WidgetId, parent_content: Rect) {
        let measured = self.measure_node(id);
        let Some(node) = self.arena.get(id) else {
            return;
        };
        let size = resolve_size(node, measured, parent_content);

        // Resolve position.
        let (ox, oy) = match node.position {
            Position::Fixed { x, y } => (x, y),
            Position::Percent { x, y } => (parent_content.width * x, parent_content.height * y),
        };

        let rect = Rect {
            x: parent_content.x + node.margin.left + ox,
            y: parent_content.y + node.margin.top + oy,
            width: size.width,
            height: size.height,
        };
        self.place(id, rect, measured);
    }

    /// Commit a node's rect, record a geometry change if it moved or
    /// resized, then lay out its children.
    fn place(&mut self, id: WidgetId, rect: Rect, measured: Size) {
        let Some(node) = self.arena.get_mut(id) else {
            return;
        };
        node.measured = measured;
        if node.rect != rect {
            self.geometry_changed.push(id);
        }
        node.rect = rect;
        node.dirty = false;

        // Content area for children (inside padding).
        let content = Rect {
            x: rect.x + node.padding.left,
            y: rect.y + node.padding.top,
            width: (rect.width - node.padding.horizontal()).max(0.0),
            height: (rect.height - node.padding.vertical()).max(0.0),
        };
        let flow = match &node.widget {
            Widget::Row { gap, align } => Flow::Row(*gap, *align),
            Widget::Column { gap, align } => Flow::Column(*gap, *align),
            _ => Flow::Stack,
        };
        let children: Vec<WidgetId> = node.children.clone();

        match flow {
            Flow::Stack => {
                for child in children {
                    self.layout_node(child, content);
                }
            }
            Flow::Row(gap, align) => self.layout_row(&children, content, gap, align),
            Flow::Column(gap, align) => self.layout_column(&children, content, gap, align),
        }
    }

    fn layout_row(&mut self, children: &[WidgetId], content: Rect, gap: f32, align: CrossAlign) {
        let mut x = content.x;
        for &child in children {
            let measured = self.measure_node(child);
            let Some(node) = self.arena.get(child) else {
                continue;
            };
            let mut size = resolve_size(node, measured, content);
            let margin = node.margin;
            if align == CrossAlign::Stretch {
                size.height = (content.height - margin.vertical()).max(0.0);
            }
            let free = content.height - size.height - margin.vertical();
            let y = content.y
                + margin.top
                + match align {
                    CrossAlign::Start | CrossAlign::Stretch => 0.0,
                    CrossAlign::Center => free / 2.0,
                    CrossAlign::End => free,
                };
            let rect = Rect {
                x: x + margin.left,
                y,
                width: size.width,
                height: size.height,
            };
            self.place(child, rect, measured);
            x += margin.horizontal() + size.width + gap;
        }
    }

    fn layout_column(
        &mut self,
        children: &[WidgetId],
        content: Rect,
        gap: f32,
        align: CrossAlign,
    ) {
        let mut y = content.y;
        for &child in children {
            let measured = self.measure_node(child);
            let Some(node) = self.arena.get(child) else {
                continue;
            };
            let mut size = resolve_size(node, measured, content);
            let margin = node.margin;
            if align == CrossAlign::Stretch {
                size.width = (content.width - margin.horizontal()).max(0.0);
            }
            let free = content.width - size.width - margin.horizontal();
            let x = content.x
                + margin.left
                + match align {
                    CrossAlign::Start | CrossAlign::Stretch => 0.0,
                    CrossAlign::Center => free / 2.0,
                    CrossAlign::End => free,
                };
            let rect = Rect {
                x,
                y: y + margin.top,
                width: size.width,
                height: size.height,
            };
            self.place(child, rect, measured);
            y += margin.vertical() + size.height + gap;
        }
    }

    /// Measure intrinsic size of a widget (content only, no padding).
    pub fn measure_node(&self, id: WidgetId) -> Size {
        let Some(node) = self.arena.get(id) else {
            return Size::default();
        };

        match &node.widget {
            Widget::Label {
                text, font_size, ..
            } => Size {
                width: text_width(text, *font_size),
                height: *font_size,
            },
            Widget::Panel { .. } | Widget::Clip => {
                // Bounding box of children at their fixed positions.
                // Draw-time offsets are deliberately not part of this.
                let mut max_w: f32 = 0.0;
                let mut max_h: f32 = 0.0;
                for &child_id in &node.children {
                    if let Some(child) = self.arena.get(child_id) {
                        let outer = self.outer_size(child_id);
                        let (cx, cy) = match child.position {
                            Position::Fixed { x, y } => (x, y),
                            Position::Percent { .. } => (0.0, 0.0),
                        };
                        max_w = max_w.max(cx + outer.width);
                        max_h = max_h.max(cy + outer.height);
                    }
                }
                Size {
                    width: max_w,
                    height: max_h,
                }
            }
            Widget::Row { gap, .. } => {
                let mut w: f32 = 0.0;
                let mut h: f32 = 0.0;
                for &child_id in &node.children {
                    let outer = self.outer_size(child_id);
                    w += outer.width;
                    h = h.max(outer.height);
                }
                w += gap * node.children.len().saturating_sub(1) as f32;
                Size {
                    width: w,
                    height: h,
                }
            }
            Widget::Column { gap, .. } => {
                let mut w: f32 = 0.0;
                let mut h: f32 = 0.0;
                for &child_id in &node.children {
                    let outer = self.outer_size(child_id);
                    w = w.max(outer.width);
                    h += outer.height;
                }
                h += gap * node.children.len().saturating_sub(1) as f32;
                Size {
                    width: w,
                    height: h,
                }
            }
        }
    }

    /// Size a child claims inside its parent: fixed sizing when set,
    /// otherwise measured content plus padding; margins included.
    fn outer_size(&self, id: WidgetId) -> Size {
        let Some(node) = self.arena.get(id) else {
            return Size::default();
        };
        let measured = self.measure_node(id);
        let width = match node.width {
            Sizing::Fixed(px) => px,
            _ => measured.width + node.padding.horizontal(),
        };
        let height = match node.height {
            Sizing::Fixed(px) => px,
            _ => measured.height + node.padding.vertical(),
        };
        Size {
            width: width + node.margin.horizontal(),
            height: height + node.margin.vertical(),
        }
    }

    // ------------------------------------------------------------------
    // Draw
    // ------------------------------------------------------------------

    /// Walk the tree and emit draw commands into a `DrawList`.
    pub fn draw(&self, draw_list: &mut DrawList) {
        for &root in &self.roots {
            self.draw_node(root, draw_list, None, 0.0);
        }
    }

    fn draw_node(&self, id: WidgetId, draw_list: &mut DrawList, clip: Option<Rect>, dx: f32) {
        let Some(node) = self.arena.get(id) else {
            return;
        };
        let dx = dx + node.offset_x;
        let rect = node.rect.shifted(dx);
        let mut clip = clip;

        match &node.widget {
            Widget::Panel {
                bg_color,
                border_color,
                border_width,
                shadow_width,
            } => {
                draw_list.panels.push(PanelCommand {
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height,
                    bg_color: *bg_color,
                    border_color: *border_color,
                    border_width: *border_width,
                    shadow_width: *shadow_width,
                });
            }
            Widget::Label {
                text,
                color,
                font_size,
                font_family,
            } => {
                draw_list.texts.push(TextCommand {
                    text: text.clone(),
                    x: rect.x,
                    y: rect.y,
                    color: *color,
                    font_size: *font_size,
                    font_family: *font_family,
                    clip,
                });
            }
            Widget::Clip => {
                clip = Some(match clip {
                    Some(outer) => outer.intersect(&rect),
                    None => rect,
                });
            }
            Widget::Row { .. } | Widget::Column { .. } => {}
        }

        // Draw children on top.
        for &child in &node.children {
            self.draw_node(child, draw_list, clip, dx);
        }
    }
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve width/height from Sizing.
fn resolve_size(node: &WidgetNode, measured: Size, parent_content: Rect) -> Size {
    let width = match node.width {
        Sizing::Fixed(px) => px,
        Sizing::Percent(frac) => parent_content.width * frac,
        Sizing::Fit => measured.width + node.padding.horizontal(),
    };
    let height = match node.height {
        Sizing::Fixed(px) => px,
        Sizing::Percent(frac) => parent_content.height * frac,
        Sizing::Fit => measured.height + node.padding.vertical(),
    };
    Size { width, height }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
