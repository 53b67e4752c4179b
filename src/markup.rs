use std::time::Instant;

use kdl::{KdlDocument, KdlNode};

use crate::ui::{
    CrossAlign, Edges, MarqueeConfig, MarqueeId, MarqueeSet, Position, Sizing, Theme, Widget,
    WidgetId, WidgetTree,
};

pub const DEFAULT_LAYOUT_PATH: &str = "data/layout.kdl";

/// What a markup document added to the tree.
#[derive(Debug, Default)]
pub struct Layout {
    pub roots: Vec<WidgetId>,
    pub marquees: Vec<MarqueeId>,
}

/// Shared state while building one document.
struct Builder<'a> {
    tree: &'a mut WidgetTree,
    marquees: &'a mut MarqueeSet,
    theme: &'a Theme,
    defaults: MarqueeConfig,
    now: Instant,
    layout: Layout,
}

/// Load a KDL layout file into `tree`. Logs a warning and returns None when
/// the file cannot be read or parsed.
pub fn load_layout(
    path: &str,
    tree: &mut WidgetTree,
    marquees: &mut MarqueeSet,
    theme: &Theme,
    defaults: MarqueeConfig,
    now: Instant,
) -> Option<Layout> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("failed to read {}: {}", path, e);
            return None;
        }
    };
    parse_layout(&content, tree, marquees, theme, defaults, now)
}

/// Build widgets from KDL source. Top-level nodes become roots.
/// Unknown nodes and malformed values are logged and skipped.
pub fn parse_layout(
    src: &str,
    tree: &mut WidgetTree,
    marquees: &mut MarqueeSet,
    theme: &Theme,
    defaults: MarqueeConfig,
    now: Instant,
) -> Option<Layout> {
    let doc = match src.parse::<KdlDocument>() {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!("failed to parse KDL layout: {}", e);
            return None;
        }
    };

    let mut builder = Builder {
        tree,
        marquees,
        theme,
        defaults,
        now,
        layout: Layout::default(),
    };
    for node in doc.nodes() {
        if let Some(id) = builder.build(node, None) {
            builder.layout.roots.push(id);
        }
    }
    Some(builder.layout)
}

impl Builder<'_> {
    fn build(&mut self, node: &KdlNode, parent: Option<WidgetId>) -> Option<WidgetId> {
        let kind = node.name().to_string();
        let theme = self.theme;
        let widget = match kind.as_str() {
            "panel" => Widget::Panel {
                bg_color: theme.bg_parchment,
                border_color: theme.panel_border_color,
                border_width: theme.panel_border_width,
                shadow_width: theme.panel_shadow_width,
            },
            "clip" => Widget::Clip,
            "row" => Widget::Row {
                gap: prop_f32(node, "gap").unwrap_or(theme.stack_gap),
                align: prop_align(node),
            },
            "column" => Widget::Column {
                gap: prop_f32(node, "gap").unwrap_or(theme.stack_gap),
                align: prop_align(node),
            },
            "label" | "marquee" => {
                let text = node
                    .get(0)
                    .and_then(|v| v.as_string())
                    .or_else(|| prop_str(node, "text"))
                    .unwrap_or_default();
                let color = if kind == "marquee" {
                    theme.marquee_text_color
                } else {
                    theme.text_dark
                };
                let font_size = prop_f32(node, "font-size")
                    .filter(|s| *s > 0.0)
                    .unwrap_or(theme.font_body_size);
                Widget::label(text, color, font_size, theme.font_body_family)
            }
            other => {
                log::warn!("unknown layout node '{}', skipping", other);
                return None;
            }
        };

        let id = match parent {
            Some(parent) => self.tree.insert(parent, widget),
            None => self.tree.insert_root(widget),
        };
        if kind == "panel" {
            self.tree.set_padding(id, Edges::all(theme.panel_padding));
        }
        self.apply_common(node, id);

        match kind.as_str() {
            "label" => {}
            "marquee" => {
                let config = MarqueeConfig {
                    scroll_speed: prop_f32(node, "scroll-speed")
                        .unwrap_or(self.defaults.scroll_speed),
                    pause_duration: prop_f32(node, "pause-time")
                        .unwrap_or(self.defaults.pause_duration),
                };
                if let Some(marquee) = self.marquees.wrap_label(self.tree, id, config, self.now) {
                    self.layout.marquees.push(marquee);
                }
            }
            _ => {
                if let Some(children) = node.children() {
                    for child in children.nodes() {
                        self.build(child, Some(id));
                    }
                }
            }
        }
        Some(id)
    }

    fn apply_common(&mut self, node: &KdlNode, id: WidgetId) {
        if let Some(name) = prop_str(node, "name") {
            self.tree.set_name(id, Some(name.to_string()));
        }
        if let Some(classes) = prop_str(node, "class") {
            for class in classes.split_whitespace() {
                self.tree.add_class(id, class);
            }
        }
        if node.get("x").is_some() || node.get("y").is_some() {
            let x = prop_f32(node, "x").unwrap_or(0.0);
            let y = prop_f32(node, "y").unwrap_or(0.0);
            self.tree.set_position(id, Position::Fixed { x, y });
        }
        let width = prop_sizing(node, "width");
        let height = prop_sizing(node, "height");
        if width.is_some() || height.is_some() {
            self.tree
                .set_sizing(id, width.unwrap_or_default(), height.unwrap_or_default());
        }
        if let Some(p) = prop_f32(node, "padding") {
            self.tree.set_padding(id, Edges::all(p));
        }
        if let Some(m) = prop_f32(node, "margin") {
            self.tree.set_margin(id, Edges::all(m));
        }
    }
}

/// String property.
fn prop_str<'a>(node: &'a KdlNode, key: &str) -> Option<&'a str> {
    node.get(key)?.as_string()
}

/// Numeric property. Accepts both float and integer values.
fn prop_f32(node: &KdlNode, key: &str) -> Option<f32> {
    let val = node.get(key)?;
    let num = val
        .as_float()
        .or_else(|| val.as_integer().map(|i| i as f64));
    if num.is_none() {
        log::warn!("'{}' on '{}' is not a number: {}", key, node.name(), val);
    }
    num.map(|n| n as f32)
}

/// Sizing property: number (pixels), "NN%", or "fit".
fn prop_sizing(node: &KdlNode, key: &str) -> Option<Sizing> {
    let val = node.get(key)?;
    if let Some(px) = val.as_float().or_else(|| val.as_integer().map(|i| i as f64)) {
        return Some(Sizing::Fixed(px as f32));
    }
    let parsed = val.as_string().and_then(parse_sizing);
    if parsed.is_none() {
        log::warn!("bad {} on '{}': {}", key, node.name(), val);
    }
    parsed
}

fn parse_sizing(s: &str) -> Option<Sizing> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("fit") {
        return Some(Sizing::Fit);
    }
    if let Some(pct) = s.strip_suffix('%') {
        let pct: f32 = pct.trim().parse().ok()?;
        return Some(Sizing::Percent(pct / 100.0));
    }
    s.parse::<f32>().ok().map(Sizing::Fixed)
}

fn prop_align(node: &KdlNode) -> CrossAlign {
    match prop_str(node, "align") {
        None | Some("start") => CrossAlign::Start,
        Some("center") => CrossAlign::Center,
        Some("end") => CrossAlign::End,
        Some("stretch") => CrossAlign::Stretch,
        Some(other) => {
            log::warn!("unknown align '{}', using start", other);
            CrossAlign::Start
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::{Construction, DEFAULT_TICK_INTERVAL};

    fn parse(src: &str) -> Option<(WidgetTree, MarqueeSet, Layout)> {
        let theme = Theme::default();
        let mut tree = WidgetTree::new();
        let mut marquees = MarqueeSet::new(&theme, DEFAULT_TICK_INTERVAL);
        let layout = parse_layout(
            src,
            &mut tree,
            &mut marquees,
            &theme,
            MarqueeConfig::default(),
            Instant::now(),
        )?;
        Some((tree, marquees, layout))
    }

    #[test]
    fn builds_nested_tree() {
        let src = r#"
            panel name="box" x=10 y=20 width=200 height="fit" {
                column gap=3 align="stretch" {
                    label "Hello" font-size=14 class="title big"
                    label text="World"
                }
            }
            clip width="50%"
        "#;
        let (tree, marquees, layout) = parse(src).expect("layout");
        assert_eq!(layout.roots.len(), 2);
        assert!(marquees.is_empty());

        let panel = tree.find_by_name("box").expect("panel");
        let node = tree.get(panel).expect("node");
        assert_eq!(node.position, Position::Fixed { x: 10.0, y: 20.0 });
        assert_eq!(node.width, Sizing::Fixed(200.0));
        assert_eq!(node.height, Sizing::Fit);
        assert_eq!(node.padding, Edges::all(Theme::default().panel_padding));

        let column = tree.children(panel)[0];
        assert!(matches!(
            tree.get(column).expect("node").widget,
            Widget::Column {
                align: CrossAlign::Stretch,
                ..
            }
        ));
        let labels = tree.children(column).to_vec();
        assert_eq!(tree.text(labels[0]), Some("Hello"));
        assert_eq!(tree.font_size(labels[0]), Some(14.0));
        assert!(tree.has_class(labels[0], "title"));
        assert!(tree.has_class(labels[0], "big"));
        assert_eq!(tree.text(labels[1]), Some("World"));

        let clip = layout.roots[1];
        assert_eq!(tree.get(clip).expect("node").width, Sizing::Percent(0.5));
    }

    #[test]
    fn marquee_nodes_are_wrapped_with_overrides() {
        let src = r#"
            column {
                marquee "Scrolling headline" name="ticker" width=80 scroll-speed=25 pause-time=0.5
                marquee "Default speed"
            }
        "#;
        let (tree, marquees, layout) = parse(src).expect("layout");
        assert_eq!(layout.marquees.len(), 2);

        let ticker = tree.find_by_name("ticker").expect("label");
        let m = marquees.get(layout.marquees[0]).expect("marquee");
        assert_eq!(m.construction(), Construction::Wrapped);
        assert_eq!(m.text_node(), ticker);
        assert!(m.is_attached());
        let container = m.container().expect("wrapped");
        assert_eq!(tree.get(container).expect("node").width, Sizing::Fixed(80.0));
        assert_eq!(tree.children(layout.roots[0])[0], container);
        assert_eq!(m.controller().config().scroll_speed, 25.0);
        assert_eq!(m.controller().config().pause_duration, 0.5);

        let plain = marquees.get(layout.marquees[1]).expect("marquee");
        assert_eq!(plain.controller().config(), MarqueeConfig::default());
    }

    #[test]
    fn unknown_nodes_and_bad_values_are_skipped() {
        let src = r#"
            bogus "x"
            row gap="wide" align="diagonal" {
                label "ok" width="huge"
                spinner
            }
        "#;
        let (tree, _marquees, layout) = parse(src).expect("layout");
        assert_eq!(layout.roots.len(), 1);
        let row = layout.roots[0];
        let theme = Theme::default();
        match tree.get(row).expect("node").widget {
            Widget::Row { gap, align } => {
                assert_eq!(gap, theme.stack_gap);
                assert_eq!(align, CrossAlign::Start);
            }
            _ => panic!("expected row"),
        }
        assert_eq!(tree.children(row).len(), 1);
        let label = tree.children(row)[0];
        assert_eq!(tree.get(label).expect("node").width, Sizing::Fit);
    }

    #[test]
    fn parse_error_returns_none() {
        assert!(parse("panel {").is_none());
    }

    #[test]
    fn sizing_strings() {
        assert_eq!(parse_sizing("fit"), Some(Sizing::Fit));
        assert_eq!(parse_sizing("25%"), Some(Sizing::Percent(0.25)));
        assert_eq!(parse_sizing("120"), Some(Sizing::Fixed(120.0)));
        assert_eq!(parse_sizing("big"), None);
    }

    #[test]
    fn missing_file_returns_none() {
        let theme = Theme::default();
        let mut tree = WidgetTree::new();
        let mut marquees = MarqueeSet::new(&theme, DEFAULT_TICK_INTERVAL);
        let layout = load_layout(
            "nonexistent/layout.kdl",
            &mut tree,
            &mut marquees,
            &theme,
            MarqueeConfig::default(),
            Instant::now(),
        );
        assert!(layout.is_none());
        assert!(tree.is_empty());
    }

    #[test]
    fn bundled_layout_loads() {
        let theme = Theme::default();
        let mut tree = WidgetTree::new();
        let mut marquees = MarqueeSet::new(&theme, DEFAULT_TICK_INTERVAL);
        let layout = load_layout(
            DEFAULT_LAYOUT_PATH,
            &mut tree,
            &mut marquees,
            &theme,
            MarqueeConfig::default(),
            Instant::now(),
        )
        .expect("bundled layout");
        assert!(!layout.roots.is_empty());
        assert!(!layout.marquees.is_empty());
    }
}
