/// Paint commands produced from a card layout

use crate::rendering::layout::{line_height, CardLayout, ElementType, LayoutNode, Rect, GLYPH};

pub type Rgba = (u8, u8, u8, u8);

pub const CARD_FILL: Rgba = (253, 242, 248, 255);
pub const ACCENT: Rgba = (236, 72, 153, 255);
pub const ACCENT_SOFT: Rgba = (249, 168, 212, 255);
pub const TITLE_INK: Rgba = (17, 24, 39, 255);
pub const BODY_INK: Rgba = (55, 65, 81, 255);
pub const MUTED_INK: Rgba = (75, 85, 99, 255);
pub const PRICE_INK: Rgba = (131, 24, 67, 255);
pub const WHITE: Rgba = (255, 255, 255, 255);
pub const PHOTO_PLACEHOLDER: Rgba = (229, 231, 235, 255);

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    SolidRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        radius: u32,
        rgba: Rgba,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        scale: u32,
        rgba: Rgba,
    },
    /// Draw the product photo, cropped to cover the rectangle
    Photo {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
    },
}

fn rect_cmd(r: &Rect, radius: u32, rgba: Rgba) -> PaintCommand {
    PaintCommand::SolidRect {
        x: r.x,
        y: r.y,
        width: r.width,
        height: r.height,
        radius,
        rgba,
    }
}

/// Emit back-to-front paint commands for every node; text lines are centered.
pub fn paint_card(layout: &CardLayout) -> Vec<PaintCommand> {
    let mut cmds = Vec::new();
    for node in &layout.nodes {
        let r = &node.rect;
        match node.elem_type {
            ElementType::Card => cmds.push(rect_cmd(r, 16, CARD_FILL)),
            ElementType::AccentBar => cmds.push(rect_cmd(r, 2, ACCENT)),
            ElementType::Photo => {
                cmds.push(rect_cmd(r, 12, PHOTO_PLACEHOLDER));
                cmds.push(PaintCommand::Photo {
                    x: r.x,
                    y: r.y,
                    width: r.width,
                    height: r.height,
                });
            }
            ElementType::PriceBox => {
                cmds.push(rect_cmd(r, 12, ACCENT_SOFT));
                cmds.push(PaintCommand::SolidRect {
                    x: r.x + 2,
                    y: r.y + 2,
                    width: r.width.saturating_sub(4),
                    height: r.height.saturating_sub(4),
                    radius: 10,
                    rgba: WHITE,
                });
            }
            ElementType::Divider => cmds.push(rect_cmd(r, 1, ACCENT_SOFT)),
            ElementType::Blossom => cmds.push(rect_cmd(r, r.width / 2, ACCENT)),
            ElementType::Title => text_lines(&mut cmds, node, TITLE_INK),
            ElementType::Description => text_lines(&mut cmds, node, BODY_INK),
            ElementType::PriceLabel => text_lines(&mut cmds, node, ACCENT),
            ElementType::PriceAmount => text_lines(&mut cmds, node, PRICE_INK),
            ElementType::Footer => text_lines(&mut cmds, node, MUTED_INK),
        }
    }
    cmds
}

fn text_lines(cmds: &mut Vec<PaintCommand>, node: &LayoutNode, rgba: Rgba) {
    let line_h = line_height(node.scale) as i32;
    for (i, line) in node.lines.iter().enumerate() {
        let text_w = line.chars().count() as i32 * (GLYPH * node.scale) as i32;
        let x = node.rect.x + (node.rect.width as i32 - text_w).max(0) / 2;
        cmds.push(PaintCommand::Text {
            x,
            y: node.rect.y + i as i32 * line_h,
            text: line.clone(),
            scale: node.scale,
            rgba,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_centered() {
        let layout = CardLayout {
            width: 100,
            height: 50,
            nodes: vec![LayoutNode {
                rect: Rect::new(0, 10, 100, 12),
                elem_type: ElementType::Footer,
                lines: vec!["abcd".into()],
                scale: 1,
            }],
        };
        let cmds = paint_card(&layout);
        match &cmds[0] {
            PaintCommand::Text { x, y, text, .. } => {
                assert_eq!(*x, 34);
                assert_eq!(*y, 10);
                assert_eq!(text, "abcd");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn photo_has_placeholder_underneath() {
        let layout = CardLayout {
            width: 100,
            height: 100,
            nodes: vec![LayoutNode {
                rect: Rect::new(0, 0, 100, 50),
                elem_type: ElementType::Photo,
                lines: Vec::new(),
                scale: 1,
            }],
        };
        let cmds = paint_card(&layout);
        assert!(matches!(cmds[0], PaintCommand::SolidRect { rgba: PHOTO_PLACEHOLDER, .. }));
        assert!(matches!(cmds[1], PaintCommand::Photo { width: 100, height: 50, .. }));
    }
}
