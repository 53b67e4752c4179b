use std::collections::HashMap;
use std::time::{Duration, Instant};

use slotmap::{SlotMap, new_key_type};

use super::marquee::{MarqueeConfig, MarqueeController, Phase};
use super::schedule::{Scheduler, TaskId};
use super::theme::Theme;
use super::{Edges, FontFamily, Position, Sizing, Widget, WidgetId, WidgetTree};

new_key_type! {
    /// Handle to a marquee registered in a `MarqueeSet`.
    pub struct MarqueeId;
}

/// How a marquee got its clipping container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Construction {
    /// Retrofitted onto an existing label. The clip container is created on
    /// attachment and takes over the label's slot, position and size.
    Wrapped,
    /// Built with its own clip container and internal label.
    Owned,
}

/// Deferred-initialization state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    /// Not in the tree yet (or detached since). Retried every tick.
    Pending,
    /// Subscribed to geometry changes and scrolling.
    Attached,
}

/// Sizing and font carried over from a label that a marquee replaced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InheritedMetrics {
    pub width: Sizing,
    pub height: Sizing,
    pub font_size: f32,
}

/// One scrolling label: a text node inside a clipping container, driven by
/// a `MarqueeController`.
pub struct MarqueeWidget {
    construction: Construction,
    text: WidgetId,
    container: Option<WidgetId>,
    controller: MarqueeController,
    attachment: Attachment,
    task: TaskId,
    inherit: Option<InheritedMetrics>,
}

impl MarqueeWidget {
    pub fn construction(&self) -> Construction {
        self.construction
    }

    /// The label whose horizontal offset is animated.
    pub fn text_node(&self) -> WidgetId {
        self.text
    }

    /// Clip container. `None` for a wrapped label that has not attached yet.
    pub fn container(&self) -> Option<WidgetId> {
        self.container
    }

    /// Outermost node: the container once built, otherwise the bare label.
    pub fn root(&self) -> WidgetId {
        self.container.unwrap_or(self.text)
    }

    pub fn controller(&self) -> &MarqueeController {
        &self.controller
    }

    pub fn attachment(&self) -> Attachment {
        self.attachment
    }

    pub fn is_attached(&self) -> bool {
        self.attachment == Attachment::Attached
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn offset(&self) -> f32 {
        self.controller.offset()
    }

    /// Host geometry notification for the container or the text.
    fn on_geometry_changed(&mut self, tree: &mut WidgetTree) {
        if let Some(metrics) = self.inherit.take()
            && let Some(container) = self.container
        {
            tree.set_sizing(container, metrics.width, metrics.height);
            tree.set_font_size(self.text, metrics.font_size);
            log::debug!("marquee {:?}: applied inherited metrics {:?}", self.text, metrics);
        }
        self.evaluate(tree);
    }

    /// Feed current resolved widths to the controller and apply its offset.
    fn evaluate(&mut self, tree: &mut WidgetTree) {
        let Some(container) = self.container else {
            return;
        };
        let text_width = tree.get(self.text).map_or(0.0, |n| n.rect.width);
        let container_width = tree.get(container).map_or(0.0, |n| n.content_width());
        self.controller.on_geometry_changed(text_width, container_width);
        tree.set_offset_x(self.text, self.controller.offset());
        log::debug!(
            "marquee {:?}: text {:.1}px in {:.1}px, scrolling={}",
            self.text,
            text_width,
            container_width,
            self.controller.is_enabled()
        );
    }
}

/// Registry and driver for every marquee in a widget tree.
///
/// Owns the recurring tick (one task per widget) and the geometry
/// subscriptions. The host calls `pump` once per frame after layout.
pub struct MarqueeSet {
    widgets: SlotMap<MarqueeId, MarqueeWidget>,
    scheduler: Scheduler,
    tasks: HashMap<TaskId, MarqueeId>,
    /// Geometry subscriptions: watched node -> marquee.
    watches: HashMap<WidgetId, MarqueeId>,
    /// Every node that belongs to a marquee.
    nodes: HashMap<WidgetId, MarqueeId>,
    tick_interval: Duration,
    text_color: [f32; 4],
    font_size: f32,
    font_family: FontFamily,
}

impl MarqueeSet {
    pub fn new(theme: &Theme, tick_interval: Duration) -> Self {
        Self {
            widgets: SlotMap::with_key(),
            scheduler: Scheduler::new(),
            tasks: HashMap::new(),
            watches: HashMap::new(),
            nodes: HashMap::new(),
            tick_interval,
            text_color: theme.marquee_text_color,
            font_size: theme.font_body_size,
            font_family: theme.font_body_family,
        }
    }

    /// Build a self-contained marquee: a detached clip container named
    /// `name` carrying `classes`, with an internal label showing `text`.
    /// The caller places the container in the tree; attachment completes
    /// on a later tick.
    pub fn create(
        &mut self,
        tree: &mut WidgetTree,
        text: &str,
        classes: &[String],
        name: Option<&str>,
        config: MarqueeConfig,
        now: Instant,
    ) -> MarqueeId {
        let container = tree.insert_detached(Widget::Clip);
        tree.set_name(container, name.map(str::to_string));
        for class in classes {
            tree.add_class(container, class);
        }
        let label = tree.insert(
            container,
            Widget::label(text, self.text_color, self.font_size, self.font_family),
        );

        let id = self.register(Construction::Owned, label, Some(container), config, now);
        self.try_attach(tree, id);
        id
    }

    /// Retrofit scrolling onto an existing label. Wrapping waits until the
    /// label has a place in the tree. Returns `None` if `label` is not a
    /// label or already belongs to a marquee.
    pub fn wrap_label(
        &mut self,
        tree: &mut WidgetTree,
        label: WidgetId,
        config: MarqueeConfig,
        now: Instant,
    ) -> Option<MarqueeId> {
        if !tree.get(label).is_some_and(|n| n.widget.is_label()) {
            log::warn!("cannot wrap {:?}: not a label", label);
            return None;
        }
        if self.nodes.contains_key(&label) {
            log::warn!("cannot wrap {:?}: already part of a marquee", label);
            return None;
        }

        let id = self.register(Construction::Wrapped, label, None, config, now);
        self.try_attach(tree, id);
        Some(id)
    }

    fn register(
        &mut self,
        construction: Construction,
        text: WidgetId,
        container: Option<WidgetId>,
        config: MarqueeConfig,
        now: Instant,
    ) -> MarqueeId {
        let task = self.scheduler.every(self.tick_interval, now);
        let id = self.widgets.insert(MarqueeWidget {
            construction,
            text,
            container,
            controller: MarqueeController::new(config),
            attachment: Attachment::Pending,
            task,
            inherit: None,
        });
        self.tasks.insert(task, id);
        self.nodes.insert(text, id);
        if let Some(container) = container {
            self.nodes.insert(container, id);
        }
        id
    }

    /// Complete deferred setup once the widget is part of the live tree. Idempotent.
    fn try_attach(&mut self, tree: &mut WidgetTree, id: MarqueeId) -> bool {
        let Some(widget) = self.widgets.get_mut(id) else {
            return false;
        };
        if widget.attachment == Attachment::Attached {
            return true;
        }
        if !tree.is_in_tree(widget.root()) {
            return false;
        }

        if widget.container.is_none() {
            let container = build_wrapper(tree, widget.text);
            if !tree.wrap(widget.text, container) {
                tree.remove(container);
                return false;
            }
            widget.container = Some(container);
            self.nodes.insert(container, id);
            log::debug!("marquee {:?}: wrapped label in {:?}", widget.text, container);
        }

        widget.attachment = Attachment::Attached;
        self.watches.insert(widget.text, id);
        if let Some(container) = widget.container {
            self.watches.insert(container, id);
        }
        // Attachment counts as the first geometry notification.
        widget.on_geometry_changed(tree);
        log::debug!("marquee {:?}: attached", widget.text);
        true
    }

    /// Forward the host's geometry notifications. Each affected marquee
    /// re-evaluates once, however many of its nodes changed.
    pub fn dispatch_geometry(&mut self, tree: &mut WidgetTree, changed: &[WidgetId]) {
        let mut hit: Vec<MarqueeId> = Vec::new();
        for node in changed {
            if let Some(&id) = self.watches.get(node)
                && !hit.contains(&id)
            {
                hit.push(id);
            }
        }
        for id in hit {
            if let Some(widget) = self.widgets.get_mut(id)
                && widget.is_attached()
            {
                widget.on_geometry_changed(tree);
            }
        }
    }

    /// Run every due tick: retry pending attachments, advance attached
    /// marquees by real elapsed time, and clean up widgets that left the
    /// tree.
    pub fn tick(&mut self, tree: &mut WidgetTree, now: Instant) {
        let due = self.scheduler.poll(now);
        let mut gone = Vec::new();
        for (task, elapsed) in due {
            let Some(&id) = self.tasks.get(&task) else {
                continue;
            };
            if !self.run_tick(tree, id, elapsed) {
                gone.push(id);
            }
        }
        for id in gone {
            log::debug!("marquee {:?}: nodes removed, unsubscribing", id);
            self.forget(id);
        }
    }

    /// Drain the tree's geometry changes, dispatch them, then tick.
    /// Call once per frame after `WidgetTree::layout`.
    pub fn pump(&mut self, tree: &mut WidgetTree, now: Instant) {
        let changed = tree.take_geometry_changes();
        self.dispatch_geometry(tree, &changed);
        self.tick(tree, now);
    }

    /// Returns false when the widget's nodes no longer exist.
    fn run_tick(&mut self, tree: &mut WidgetTree, id: MarqueeId, elapsed: Duration) -> bool {
        let Some(widget) = self.widgets.get_mut(id) else {
            return false;
        };
        let alive =
            tree.contains(widget.text) && widget.container.is_none_or(|c| tree.contains(c));
        if !alive {
            return false;
        }

        match widget.attachment {
            Attachment::Pending => {
                self.try_attach(tree, id);
            }
            Attachment::Attached if !tree.is_in_tree(widget.root()) => {
                self.suspend(tree, id);
            }
            Attachment::Attached => {
                let offset = widget.controller.advance(elapsed.as_secs_f32());
                tree.set_offset_x(widget.text, offset);
            }
        }
        true
    }

    /// Widget left the live tree (it or an ancestor was detached) but still
    /// exists: drop its scroll state and geometry subscriptions and go back
    /// to waiting for a parent.
    fn suspend(&mut self, tree: &mut WidgetTree, id: MarqueeId) {
        let Some(widget) = self.widgets.get_mut(id) else {
            return;
        };
        widget.controller.reset();
        widget.attachment = Attachment::Pending;
        tree.set_offset_x(widget.text, 0.0);
        self.watches.retain(|_, owner| *owner != id);
        log::debug!("marquee {:?}: detached", widget.text);
    }

    /// Unsubscribe everything and drop the registry entry. Leaves the tree
    /// untouched.
    fn forget(&mut self, id: MarqueeId) -> Option<MarqueeWidget> {
        let widget = self.widgets.remove(id)?;
        self.scheduler.cancel(widget.task);
        self.tasks.remove(&widget.task);
        self.watches.retain(|_, owner| *owner != id);
        self.nodes.retain(|_, owner| *owner != id);
        Some(widget)
    }

    /// Destroy a marquee: unsubscribe it and remove its nodes from the tree.
    pub fn destroy(&mut self, tree: &mut WidgetTree, id: MarqueeId) -> bool {
        let Some(widget) = self.forget(id) else {
            return false;
        };
        tree.remove(widget.root());
        log::debug!("marquee {:?}: destroyed", widget.text);
        true
    }

    /// Replace the label text. Scrolling re-evaluates on the next layout
    /// pass that reports the new size, not here.
    pub fn set_text(&mut self, tree: &mut WidgetTree, id: MarqueeId, value: &str) -> bool {
        match self.widgets.get(id) {
            Some(widget) => tree.set_text(widget.text, value),
            None => false,
        }
    }

    pub fn set_scroll_speed(&mut self, id: MarqueeId, speed: f32) {
        if let Some(widget) = self.widgets.get_mut(id) {
            widget.controller.set_scroll_speed(speed);
        }
    }

    pub fn set_pause_duration(&mut self, id: MarqueeId, seconds: f32) {
        if let Some(widget) = self.widgets.get_mut(id) {
            widget.controller.set_pause_duration(seconds);
        }
    }

    /// Metrics to apply on the widget's first geometry notification.
    pub fn inherit_metrics(&mut self, id: MarqueeId, metrics: InheritedMetrics) {
        if let Some(widget) = self.widgets.get_mut(id) {
            widget.inherit = Some(metrics);
        }
    }

    pub fn get(&self, id: MarqueeId) -> Option<&MarqueeWidget> {
        self.widgets.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MarqueeId, &MarqueeWidget)> {
        self.widgets.iter()
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Marquee that owns `node` (its text or container), if any.
    pub fn owner_of(&self, node: WidgetId) -> Option<MarqueeId> {
        self.nodes.get(&node).copied()
    }

    /// True if geometry changes of `node` reach a marquee.
    pub fn is_watching(&self, node: WidgetId) -> bool {
        self.watches.contains_key(&node)
    }

    /// Number of live recurring tick tasks.
    pub fn scheduled_ticks(&self) -> usize {
        self.scheduler.len()
    }
}

/// Create a detached clip container that inherits the label's placement.
/// The label is reset to fit its text at the container's origin.
fn build_wrapper(tree: &mut WidgetTree, label: WidgetId) -> WidgetId {
    let (position, width, height, margin) = match tree.get(label) {
        Some(n) => (n.position, n.width, n.height, n.margin),
        None => (Position::default(), Sizing::Fit, Sizing::Fit, Edges::ZERO),
    };
    let container = tree.insert_detached(Widget::Clip);
    tree.set_position(container, position);
    tree.set_sizing(container, width, height);
    tree.set_margin(container, margin);

    tree.set_position(label, Position::Fixed { x: 0.0, y: 0.0 });
    tree.set_sizing(label, Sizing::Fit, Sizing::Fit);
    tree.set_margin(label, Edges::ZERO);
    container
}
