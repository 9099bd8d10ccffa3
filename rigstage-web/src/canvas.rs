/// Canvas 2D backend for the viewport draw list and the timeline strip
use nalgebra::{Matrix4, Point3};
use rigstage_core::{Camera, DrawCommand, Frame, Keyframe, Mesh, Shade, TimelineRuler};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

const BACKGROUND: &str = "#1a1a1a";
const RULER_LINE: &str = "#2a2a2a";
const RULER_LABEL: &str = "#666";
const KEYFRAME: &str = "#0ea5e9";
const PLAYHEAD: &str = "#ea384c";
const MARKER_RADIUS_PX: f64 = 10.0;

pub fn canvas_context(canvas_id: &str) -> Result<(HtmlCanvasElement, CanvasRenderingContext2d), JsValue> {
    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or_else(|| JsValue::from_str("no document available"))?;

    let canvas = document
        .get_element_by_id(canvas_id)
        .ok_or_else(|| JsValue::from_str(&format!("no element with id `{}`", canvas_id)))?
        .dyn_into::<HtmlCanvasElement>()?;

    let context = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
        .dyn_into::<CanvasRenderingContext2d>()?;

    Ok((canvas, context))
}

fn clear(context: &CanvasRenderingContext2d, width: f64, height: f64) {
    context.set_fill_style_str(BACKGROUND);
    context.fill_rect(0.0, 0.0, width, height);
}

/// Draw a viewport draw list, painter-style in list order
pub fn draw_viewport(
    context: &CanvasRenderingContext2d,
    commands: &[DrawCommand],
    camera: &Camera,
    width: u32,
    height: u32,
) -> Result<(), JsValue> {
    clear(context, f64::from(width), f64::from(height));

    let identity = Matrix4::identity();
    let project = |point: &Point3<f32>, model: &Matrix4<f32>| {
        camera
            .project_to_screen(point, model, width, height)
            .map(|(x, y, _)| (f64::from(x), f64::from(y)))
    };
    let light_dir = (camera.position() - camera.target).normalize();

    for command in commands {
        match command {
            DrawCommand::Line { from, to, shade } => {
                if let (Some(a), Some(b)) = (project(from, &identity), project(to, &identity)) {
                    context.set_stroke_style_str(shade.hex());
                    context.set_line_width(if *shade == Shade::Axis { 2.0 } else { 1.0 });
                    context.begin_path();
                    context.move_to(a.0, a.1);
                    context.line_to(b.0, b.1);
                    context.stroke();
                }
            }
            DrawCommand::Box {
                transform,
                half_extents,
                shade,
                ..
            } => {
                context.set_fill_style_str(shade.hex());
                for triangle in &Mesh::cuboid(half_extents).triangles {
                    let normal = transform.transform_vector(&triangle.calculate_normal());
                    if normal.dot(&light_dir) <= 0.0 {
                        continue;
                    }

                    let corners: Option<Vec<_>> = triangle
                        .vertices
                        .iter()
                        .map(|vertex| project(&vertex.position, transform))
                        .collect();
                    let Some(corners) = corners else {
                        continue;
                    };

                    context.begin_path();
                    context.move_to(corners[0].0, corners[0].1);
                    for corner in &corners[1..] {
                        context.line_to(corner.0, corner.1);
                    }
                    context.close_path();
                    context.fill();
                }
            }
            DrawCommand::JointMarker {
                position, shade, ..
            } => {
                if let Some((x, y)) = project(position, &identity) {
                    context.set_stroke_style_str(shade.hex());
                    context.set_line_width(3.0);
                    context.begin_path();
                    context.arc(x, y, MARKER_RADIUS_PX, 0.0, std::f64::consts::TAU)?;
                    context.stroke();
                }
            }
        }
    }

    Ok(())
}

/// Draw the timeline: ruler grid, keyframe dots and the playhead
pub fn draw_timeline(
    context: &CanvasRenderingContext2d,
    ruler: &TimelineRuler,
    keyframes: &[Keyframe],
    current: Frame,
    height: u32,
) -> Result<(), JsValue> {
    let height = f64::from(height);
    clear(context, f64::from(ruler.width()), height);

    context.set_line_width(1.0);
    context.set_font("10px sans-serif");
    for tick in ruler.ticks() {
        let x = f64::from(tick.x);
        context.set_stroke_style_str(RULER_LINE);
        context.begin_path();
        context.move_to(x, 0.0);
        context.line_to(x, height);
        context.stroke();

        if tick.labeled {
            context.set_fill_style_str(RULER_LABEL);
            context.fill_text(&tick.frame.to_string(), x + 2.0, 12.0)?;
        }
    }

    context.set_fill_style_str(KEYFRAME);
    for key in keyframes {
        context.begin_path();
        context.arc(
            f64::from(ruler.marker_x(key.frame)),
            height / 2.0,
            4.0,
            0.0,
            std::f64::consts::TAU,
        )?;
        context.fill();
    }

    let x = f64::from(ruler.marker_x(current));
    context.set_stroke_style_str(PLAYHEAD);
    context.set_line_width(2.0);
    context.begin_path();
    context.move_to(x, 0.0);
    context.line_to(x, height);
    context.stroke();

    Ok(())
}
