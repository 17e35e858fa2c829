//! SVG serialization of a scene.

use inkpad_core::SceneGraph;
use inkpad_core::shapes::{SerializableColor, Shape, ShapeStyle, Text, TextAlign};
use kurbo::Point;
use svg::Document;
use svg::node::element as svg_element;

/// Serialize the scene as a standalone SVG document, back to front.
pub fn scene_to_svg(scene: &dyn SceneGraph) -> String {
    let size = scene.size();
    let background = scene.background();

    let mut doc = Document::new()
        .set("viewBox", format!("0 0 {} {}", size.width, size.height))
        .set("width", size.width)
        .set("height", size.height);

    let mut backdrop = svg_element::Rectangle::new()
        .set("x", 0)
        .set("y", 0)
        .set("width", size.width)
        .set("height", size.height)
        .set("fill", rgb_hex(background));
    if background.a < 255 {
        backdrop = backdrop.set("fill-opacity", alpha(background));
    }
    doc = doc.add(backdrop);

    for shape in scene.shapes_ordered() {
        doc = match shape {
            Shape::Rectangle(rect) => doc.add(styled(
                svg_element::Rectangle::new()
                    .set("x", rect.position.x)
                    .set("y", rect.position.y)
                    .set("width", rect.width)
                    .set("height", rect.height),
                &rect.style,
            )),
            Shape::Ellipse(ellipse) => doc.add(styled(
                svg_element::Ellipse::new()
                    .set("cx", ellipse.center.x)
                    .set("cy", ellipse.center.y)
                    .set("rx", ellipse.radius_x)
                    .set("ry", ellipse.radius_y),
                &ellipse.style,
            )),
            Shape::Triangle(triangle) => doc.add(styled(
                svg_element::Polygon::new().set("points", points_attr(&triangle.vertices())),
                &triangle.style,
            )),
            Shape::Polygon(polygon) => doc.add(styled(
                svg_element::Polygon::new().set("points", points_attr(&polygon.points)),
                &polygon.style,
            )),
            Shape::Text(text) => doc.add(text_group(text)),
            Shape::Image(image) => {
                let mut element = svg_element::Image::new()
                    .set("x", image.position.x)
                    .set("y", image.position.y)
                    .set("width", image.width)
                    .set("height", image.height)
                    .set("preserveAspectRatio", "none")
                    .set("href", image.data_url());
                if image.style.opacity < 1.0 {
                    element = element.set("opacity", image.style.opacity);
                }
                doc.add(element)
            }
        };
    }

    doc.to_string()
}

/// Apply fill and opacity attributes.
fn styled<T: Settable>(element: T, style: &ShapeStyle) -> T {
    let mut element = element.with("fill", rgb_hex(style.fill_color).into());
    if style.fill_color.a < 255 {
        element = element.with("fill-opacity", alpha(style.fill_color).into());
    }
    if style.opacity < 1.0 {
        element = element.with("opacity", style.opacity.into());
    }
    element
}

/// Builder-style attribute setter shared by the element types we emit.
trait Settable: Sized {
    fn with(self, name: &str, value: svg::node::Value) -> Self;
}

macro_rules! settable {
    ($($ty:ty),*) => {
        $(impl Settable for $ty {
            fn with(self, name: &str, value: svg::node::Value) -> Self {
                self.set(name, value)
            }
        })*
    };
}

settable!(
    svg_element::Rectangle,
    svg_element::Ellipse,
    svg_element::Polygon
);

/// One `<text>` per line inside a group carrying the font attributes.
fn text_group(text: &Text) -> svg_element::Group {
    let bounds = inkpad_core::shapes::ShapeTrait::bounds(text);
    let (anchor, x) = match text.align {
        TextAlign::Left | TextAlign::Justify => ("start", bounds.x0),
        TextAlign::Center => ("middle", bounds.center().x),
        TextAlign::Right => ("end", bounds.x1),
    };

    let mut group = svg_element::Group::new()
        .set("font-family", text.font_family.as_str())
        .set("font-size", text.font_size)
        .set("font-weight", text.font_weight.css_value())
        .set("font-style", text.font_style.css_value())
        .set("text-anchor", anchor)
        .set("dominant-baseline", "text-before-edge")
        .set("fill", rgb_hex(text.style.fill_color));
    if text.underline {
        group = group.set("text-decoration", "underline");
    }
    if text.style.fill_color.a < 255 {
        group = group.set("fill-opacity", alpha(text.style.fill_color));
    }
    if text.style.opacity < 1.0 {
        group = group.set("opacity", text.style.opacity);
    }

    let line_height = text.font_size * Text::LINE_HEIGHT;
    for (i, line) in text.content.split('\n').enumerate() {
        group = group.add(
            svg_element::Text::new(line)
                .set("x", x)
                .set("y", text.position.y + i as f64 * line_height),
        );
    }
    group
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn rgb_hex(color: SerializableColor) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
}

fn alpha(color: SerializableColor) -> f64 {
    f64::from(color.a) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkpad_core::Canvas;
    use inkpad_core::shapes::{Ellipse, FontWeight, Image, ImageFormat, Polygon, Rectangle};

    fn red() -> ShapeStyle {
        ShapeStyle::new(SerializableColor::new(255, 0, 0, 255), 0.5)
    }

    #[test]
    fn test_document_frame() {
        let mut canvas = Canvas::new();
        canvas.set_background(SerializableColor::new(0x12, 0x34, 0x56, 255));
        let svg = scene_to_svg(&canvas);
        assert!(svg.contains("viewBox=\"0 0 800 600\""));
        assert!(svg.contains("fill=\"#123456\""));
    }

    #[test]
    fn test_shapes_serialized_in_order() {
        let mut canvas = Canvas::new();
        canvas.add(Shape::Rectangle(
            Rectangle::new(Point::new(10.0, 20.0), 50.0, 50.0).with_style(red()),
        ));
        canvas.add(Shape::Ellipse(Ellipse::circle(Point::new(125.0, 125.0), 25.0)));
        canvas.add(Shape::Polygon(Polygon::regular(Point::new(0.0, 0.0), 60.0, 6)));
        let svg = scene_to_svg(&canvas);

        let rect = svg.rfind("<rect").expect("rect");
        let ellipse = svg.find("<ellipse").expect("ellipse");
        let polygon = svg.find("<polygon").expect("polygon");
        assert!(rect < ellipse && ellipse < polygon);
        assert!(svg.contains("fill=\"#ff0000\""));
        assert!(svg.contains("opacity=\"0.5\""));
        assert!(svg.contains("rx=\"25\""));
        assert!(svg.contains("points=\"60,0 "));
    }

    #[test]
    fn test_text_attributes() {
        let mut canvas = Canvas::new();
        let mut text = Text::new(Point::new(50.0, 50.0), "Hello\nWorld".into());
        text.font_weight = FontWeight::Bold;
        text.underline = true;
        text.align = TextAlign::Center;
        canvas.add(Shape::Text(text));
        let svg = scene_to_svg(&canvas);

        assert!(svg.contains("font-family=\"Arial\""));
        assert!(svg.contains("font-weight=\"bold\""));
        assert!(svg.contains("text-decoration=\"underline\""));
        assert!(svg.contains("text-anchor=\"middle\""));
        let lines: Vec<&str> = svg
            .split("<text")
            .skip(1)
            .filter_map(|node| node.split_once('>'))
            .filter_map(|(_, rest)| rest.split_once("</text>"))
            .map(|(content, _)| content.trim())
            .collect();
        assert_eq!(lines, ["Hello", "World"]);
    }

    #[test]
    fn test_image_embeds_data_url() {
        let mut canvas = Canvas::new();
        canvas.add(Shape::Image(
            Image::new(Point::new(50.0, 50.0), &[1, 2, 3], 100, 100, ImageFormat::Png).scaled(0.06),
        ));
        let svg = scene_to_svg(&canvas);
        assert!(svg.contains("href=\"data:image/png;base64,AQID\""));
        assert!(svg.contains("x=\"50\""));
    }
}
