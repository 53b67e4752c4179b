use std::time::Instant;

use super::marquee::MarqueeConfig;
use super::marquee_widget::{InheritedMetrics, MarqueeSet};
use super::{WidgetId, WidgetTree};

/// Replace every plain label below `root` with an owned marquee.
///
/// Walks depth-first over a snapshot of each child list. A replaced label's
/// text, name, classes, position and margin carry over immediately. Its
/// sizing and font size are applied on the marquee's first geometry
/// notification. Nodes that already belong to a marquee are left alone.
/// Returns the number of labels replaced.
pub fn substitute_labels(
    tree: &mut WidgetTree,
    marquees: &mut MarqueeSet,
    root: WidgetId,
    config: MarqueeConfig,
    now: Instant,
) -> usize {
    let children: Vec<WidgetId> = tree.children(root).to_vec();
    let mut replaced = 0;
    for child in children {
        if marquees.owner_of(child).is_some() {
            continue;
        }
        let is_label = tree.get(child).is_some_and(|n| n.widget.is_label());
        if is_label {
            if replace_label(tree, marquees, root, child, config, now) {
                replaced += 1;
            }
        } else {
            replaced += substitute_labels(tree, marquees, child, config, now);
        }
    }
    replaced
}

fn replace_label(
    tree: &mut WidgetTree,
    marquees: &mut MarqueeSet,
    parent: WidgetId,
    label: WidgetId,
    config: MarqueeConfig,
    now: Instant,
) -> bool {
    let Some(index) = tree.index_of(label) else {
        return false;
    };
    let Some(node) = tree.get(label) else {
        return false;
    };
    let text = tree.text(label).unwrap_or_default().to_string();
    let name = node.name.clone();
    let classes: Vec<String> = node.classes.iter().cloned().collect();
    let (position, margin) = (node.position, node.margin);
    let metrics = InheritedMetrics {
        width: node.width,
        height: node.height,
        font_size: tree.font_size(label).unwrap_or_default(),
    };

    tree.remove(label);
    let id = marquees.create(tree, &text, &classes, name.as_deref(), config, now);
    let Some(container) = marquees.get(id).and_then(|m| m.container()) else {
        return false;
    };
    tree.set_position(container, position);
    tree.set_margin(container, margin);
    marquees.inherit_metrics(id, metrics);
    if !tree.attach_at(parent, index, container) {
        log::warn!("could not place marquee for label {:?}", label);
        marquees.destroy(tree, id);
        return false;
    }
    log::debug!("replaced label {:?} ({:?}) with marquee", label, name);
    true
}
