/// Fixed layout of the preview card.
///
/// Coordinates are in card pixels (scale 1). Text uses an 8px monospace
/// bitmap font, so a line of `n` characters at text scale `s` is `8 * n * s`
/// pixels wide.

use crate::rendering::{CardContent, RenderOptions};

pub const GLYPH: u32 = 8;
const PADDING: u32 = 32;
const SECTION_GAP: u32 = 24;
const PHOTO_HEIGHT: u32 = 192;
const ACCENT_WIDTH: u32 = 64;
const PRICE_BOX_PADDING: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x: x as i32,
            y: y as i32,
            width,
            height,
        }
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    Card,
    Title,
    AccentBar,
    Photo,
    Description,
    PriceBox,
    PriceLabel,
    PriceAmount,
    Divider,
    Blossom,
    Footer,
}

/// One positioned element. Text elements carry their already wrapped lines.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutNode {
    pub rect: Rect,
    pub elem_type: ElementType,
    pub lines: Vec<String>,
    pub scale: u32,
}

impl LayoutNode {
    fn block(elem_type: ElementType, rect: Rect) -> Self {
        Self {
            rect,
            elem_type,
            lines: Vec::new(),
            scale: 1,
        }
    }

    fn text(elem_type: ElementType, rect: Rect, lines: Vec<String>, scale: u32) -> Self {
        Self {
            rect,
            elem_type,
            lines,
            scale,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub width: u32,
    pub height: u32,
    pub nodes: Vec<LayoutNode>,
}

impl CardLayout {
    pub fn find(&self, elem_type: ElementType) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.elem_type == elem_type)
    }
}

pub fn line_height(scale: u32) -> u32 {
    GLYPH * scale + 4 * scale
}

/// Greedy word wrap to at most `max_chars` characters per line. Words longer
/// than a line are split.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut cur = String::new();
        let mut cur_len = 0usize;
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > max_chars {
                if cur_len > 0 {
                    lines.push(std::mem::take(&mut cur));
                    cur_len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            if word.is_empty() {
                continue;
            }
            if cur_len > 0 && cur_len + 1 + word.len() > max_chars {
                lines.push(std::mem::take(&mut cur));
                cur_len = 0;
            }
            if cur_len > 0 {
                cur.push(' ');
                cur_len += 1;
            }
            cur_len += word.len();
            cur.extend(word);
        }
        if cur_len > 0 {
            lines.push(cur);
        }
    }
    lines
}

fn wrapped_block(text: &str, content_width: u32, scale: u32) -> (Vec<String>, u32) {
    let chars_per_line = (content_width / (GLYPH * scale)) as usize;
    let lines = wrap_text(text, chars_per_line);
    let height = lines.len().max(1) as u32 * line_height(scale);
    (lines, height)
}

/// Lay out the card top to bottom: title, accent bar, photo, description,
/// price box, branding footer. The card grows past `card_min_height` when
/// the text needs it.
pub fn layout_card(content: &CardContent<'_>, options: &RenderOptions) -> CardLayout {
    let width = options.card_width;
    let content_width = width.saturating_sub(PADDING * 2).max(GLYPH * 3);
    let mut nodes = Vec::new();
    let mut y = PADDING;

    let (title_lines, title_h) = wrapped_block(content.title, content_width, 2);
    nodes.push(LayoutNode::text(
        ElementType::Title,
        Rect::new(PADDING, y, content_width, title_h),
        title_lines,
        2,
    ));
    y += title_h + 4;

    let accent_x = PADDING + content_width.saturating_sub(ACCENT_WIDTH) / 2;
    nodes.push(LayoutNode::block(
        ElementType::AccentBar,
        Rect::new(accent_x, y, ACCENT_WIDTH.min(content_width), 4),
    ));
    y += 4 + SECTION_GAP;

    nodes.push(LayoutNode::block(
        ElementType::Photo,
        Rect::new(PADDING, y, content_width, PHOTO_HEIGHT),
    ));
    y += PHOTO_HEIGHT + SECTION_GAP;

    let (desc_lines, desc_h) = wrapped_block(content.description, content_width, 1);
    nodes.push(LayoutNode::text(
        ElementType::Description,
        Rect::new(PADDING, y, content_width, desc_h),
        desc_lines,
        1,
    ));
    y += desc_h + SECTION_GAP;

    let label_h = line_height(1);
    let amount_h = line_height(3);
    let box_h = PRICE_BOX_PADDING * 2 + label_h + amount_h;
    nodes.push(LayoutNode::block(
        ElementType::PriceBox,
        Rect::new(PADDING, y, content_width, box_h),
    ));
    let inner_width = content_width.saturating_sub(PRICE_BOX_PADDING * 2);
    let (label_lines, _) = wrapped_block(content.price_label, inner_width, 1);
    nodes.push(LayoutNode::text(
        ElementType::PriceLabel,
        Rect::new(PADDING + PRICE_BOX_PADDING, y + PRICE_BOX_PADDING, inner_width, label_h),
        label_lines.into_iter().take(1).collect(),
        1,
    ));
    nodes.push(LayoutNode::text(
        ElementType::PriceAmount,
        Rect::new(
            PADDING + PRICE_BOX_PADDING,
            y + PRICE_BOX_PADDING + label_h,
            inner_width,
            amount_h,
        ),
        vec![content.price.to_string()],
        3,
    ));
    y += box_h + SECTION_GAP;

    let center = PADDING + content_width / 2;
    let blossom = 12u32;
    nodes.push(LayoutNode::block(
        ElementType::Divider,
        Rect::new(center.saturating_sub(blossom / 2 + 8 + 32), y + 5, 32, 2),
    ));
    nodes.push(LayoutNode::block(
        ElementType::Blossom,
        Rect::new(center.saturating_sub(blossom / 2), y, blossom, blossom),
    ));
    nodes.push(LayoutNode::block(
        ElementType::Divider,
        Rect::new(center + blossom / 2 + 8, y + 5, 32, 2),
    ));
    y += blossom + 8;

    let footer_lines: Vec<String> = [content.business_name, content.phone]
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.trim().to_string())
        .collect();
    let footer_h = footer_lines.len() as u32 * line_height(1);
    nodes.push(LayoutNode::text(
        ElementType::Footer,
        Rect::new(PADDING, y, content_width, footer_h),
        footer_lines,
        1,
    ));
    y += footer_h + PADDING;

    let height = y.max(options.card_min_height);
    nodes.insert(0, LayoutNode::block(ElementType::Card, Rect::new(0, 0, width, height)));

    CardLayout {
        width,
        height,
        nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageAsset;

    fn content<'a>(photo: &'a ImageAsset, description: &'a str) -> CardContent<'a> {
        CardContent {
            title: "Ramo primavera",
            description,
            price_label: "Sale price",
            price: "$50.00",
            business_name: "Claudia Segura",
            phone: "55 4917 1408",
            photo,
        }
    }

    #[test]
    fn wrap_text_breaks_on_words() {
        assert_eq!(wrap_text("hello big world", 9), vec!["hello big", "world"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
        assert!(wrap_text("   ", 10).is_empty());
    }

    #[test]
    fn card_stacks_sections_in_order() {
        let photo = ImageAsset::new("image/png", vec![1]);
        let layout = layout_card(&content(&photo, "Doce rosas rojas"), &RenderOptions::default());
        assert_eq!(layout.width, 400);
        assert!(layout.height >= 500);

        let order = [
            ElementType::Title,
            ElementType::Photo,
            ElementType::Description,
            ElementType::PriceBox,
            ElementType::Footer,
        ];
        let ys: Vec<i32> = order.iter().map(|t| layout.find(*t).unwrap().rect.y).collect();
        assert!(ys.windows(2).all(|w| w[0] < w[1]));

        let footer = layout.find(ElementType::Footer).unwrap();
        assert_eq!(footer.lines, vec!["Claudia Segura", "55 4917 1408"]);
        assert_eq!(layout.find(ElementType::Card).unwrap().rect.height, layout.height);
    }

    #[test]
    fn long_description_grows_the_card() {
        let photo = ImageAsset::new("image/png", vec![1]);
        let short = layout_card(&content(&photo, "Doce rosas"), &RenderOptions::default());
        let long = "petalo ".repeat(200);
        let layout = layout_card(&content(&photo, &long), &RenderOptions::default());
        assert!(layout.height > short.height);
        let footer = layout.find(ElementType::Footer).unwrap();
        assert!(footer.rect.bottom() as u32 <= layout.height);
    }
}
