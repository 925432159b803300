// Text and panel overlay drawn with egui on top of the scene

use crate::core::Rect;
use glam::{Vec2, Vec4};

/// Where a panel sits in the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Alignment {
    TopLeft,
    Top,
    TopRight,
    Left,
    Center,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
    /// Text top-left at a fixed screen position
    At(Vec2),
}

/// Top-left corner of a text block of `text_size` inside `viewport`.
///
/// Edge alignments keep the text two paddings away from the border so the
/// panel background (one padding around the text) stays fully on screen.
pub fn text_position(alignment: Alignment, viewport: Vec2, text_size: Vec2, padding: Vec2) -> Vec2 {
    let left = padding.x * 2.0;
    let top = padding.y * 2.0;
    let right = viewport.x - text_size.x - padding.x * 2.0;
    let bottom = viewport.y - text_size.y - padding.y * 2.0;
    let centre = (viewport - text_size) * 0.5;

    match alignment {
        Alignment::TopLeft => Vec2::new(left, top),
        Alignment::Top => Vec2::new(centre.x, top),
        Alignment::TopRight => Vec2::new(right, top),
        Alignment::Left => Vec2::new(left, centre.y),
        Alignment::Center => centre,
        Alignment::Right => Vec2::new(right, centre.y),
        Alignment::BottomLeft => Vec2::new(left, bottom),
        Alignment::Bottom => Vec2::new(centre.x, bottom),
        Alignment::BottomRight => Vec2::new(right, bottom),
        Alignment::At(position) => position,
    }
}

/// Background rectangle around text placed at `text_pos`
pub fn panel_rect(text_pos: Vec2, text_size: Vec2, padding: Vec2) -> Rect {
    Rect::new(
        text_pos.x - padding.x,
        text_pos.y - padding.y,
        text_size.x + padding.x * 2.0,
        text_size.y + padding.y * 2.0,
    )
}

/// Which point of the text `position` refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    TopLeft,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayCommand {
    Text {
        text: String,
        position: Vec2,
        anchor: TextAnchor,
        size: f32,
        color: Vec4,
        /// Drawn one pixel down-right, underneath
        shadow: Option<Vec4>,
    },
    Panel {
        text: String,
        alignment: Alignment,
        padding: Vec2,
        size: f32,
        text_color: Vec4,
        background: Vec4,
    },
    Fill {
        rect: Rect,
        color: Vec4,
    },
}

/// Screen-space UI drawn after post-processing
#[derive(Debug, Clone, Default)]
pub struct Overlay {
    commands: Vec<OverlayCommand>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: OverlayCommand) {
        self.commands.push(command);
    }
    /// Text centred on `position`

    #[cfg(test)]
    pub fn centered_text(&mut self, text: &str, position: Vec2, size: f32, color: Vec4) {
        self.push(OverlayCommand::Text {
            text: text.to_string(),
            position,
            anchor: TextAnchor::Center,
            size,
            color,
            shadow: None,
        });
    }

    pub fn fill(&mut self, rect: Rect, color: Vec4) {
        self.push(OverlayCommand::Fill { rect, color });
    }

    pub fn commands(&self) -> &[OverlayCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

fn to_color32(color: Vec4) -> egui::Color32 {
    let [r, g, b, a] = (color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0).round().to_array();
    egui::Color32::from_rgba_unmultiplied(r as u8, g as u8, b as u8, a as u8)
}

fn to_egui_rect(rect: Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(rect.x, rect.y),
        egui::vec2(rect.width, rect.height),
    )
}

/// Paints an [`Overlay`] through egui's tessellator and wgpu renderer
pub struct OverlayPainter {
    context: egui::Context,
    renderer: egui_wgpu::Renderer,
}

impl OverlayPainter {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        Self {
            context: egui::Context::default(),
            renderer: egui_wgpu::Renderer::new(device, format, None, 1),
        }
    }

    fn paint_commands(ctx: &egui::Context, viewport: Vec2, overlay: &Overlay) {
        let painter = ctx.layer_painter(egui::LayerId::new(
            egui::Order::Foreground,
            egui::Id::new("overlay"),
        ));

        for command in overlay.commands() {
            match command {
                OverlayCommand::Text {
                    text,
                    position,
                    anchor,
                    size,
                    color,
                    shadow,
                } => {
                    let align = match anchor {
                        TextAnchor::TopLeft => egui::Align2::LEFT_TOP,
                        TextAnchor::Center => egui::Align2::CENTER_CENTER,
                    };
                    let font = egui::FontId::proportional(*size);
                    if let Some(shadow) = shadow {
                        painter.text(
                            egui::pos2(position.x + 1.0, position.y + 1.0),
                            align,
                            text,
                            font.clone(),
                            to_color32(*shadow),
                        );
                    }
                    painter.text(
                        egui::pos2(position.x, position.y),
                        align,
                        text,
                        font,
                        to_color32(*color),
                    );
                }
                OverlayCommand::Panel {
                    text,
                    alignment,
                    padding,
                    size,
                    text_color,
                    background,
                } => {
                    let font = egui::FontId::proportional(*size);
                    let galley =
                        painter.layout_no_wrap(text.clone(), font.clone(), to_color32(*text_color));
                    let text_size = Vec2::new(galley.size().x, galley.size().y);
                    let pos = text_position(*alignment, viewport, text_size, *padding);

                    painter.rect_filled(
                        to_egui_rect(panel_rect(pos, text_size, *padding)),
                        4.0,
                        to_color32(*background),
                    );
                    painter.text(
                        egui::pos2(pos.x, pos.y),
                        egui::Align2::LEFT_TOP,
                        text,
                        font,
                        to_color32(*text_color),
                    );
                }
                OverlayCommand::Fill { rect, color } => {
                    painter.rect_filled(to_egui_rect(*rect), 0.0, to_color32(*color));
                }
            }
        }
    }

    /// Draw `overlay` on top of whatever `target` already holds
    pub fn paint(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
        overlay: &Overlay,
    ) {
        let viewport = Vec2::new(size_in_pixels[0] as f32, size_in_pixels[1] as f32);
        let raw_input = egui::RawInput {
            screen_rect: Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(viewport.x, viewport.y),
            )),
            ..Default::default()
        };

        let output = self
            .context
            .run(raw_input, |ctx| Self::paint_commands(ctx, viewport, overlay));
        let primitives = self.context.tessellate(output.shapes, output.pixels_per_point);

        for (id, delta) in &output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, delta);
        }

        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: output.pixels_per_point,
        };
        self.renderer
            .update_buffers(device, queue, encoder, &primitives, &screen);

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Overlay Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            self.renderer.render(&mut pass, &primitives, &screen);
        }

        for id in &output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);
    const TEXT: Vec2 = Vec2::new(200.0, 20.0);
    const PADDING: Vec2 = Vec2::new(32.0, 16.0);

    #[test]
    fn test_egui_renderer_constructor_matches_pinned_version() {
        // Device-free check of the constructor shape OverlayPainter::new relies on
        let _new: fn(
            &wgpu::Device,
            wgpu::TextureFormat,
            Option<wgpu::TextureFormat>,
            u32,
        ) -> egui_wgpu::Renderer = egui_wgpu::Renderer::new;
    }

    #[test]
    fn test_center_alignment() {
        let pos = text_position(Alignment::Center, VIEWPORT, TEXT, PADDING);
        assert_eq!(pos, Vec2::new(300.0, 290.0));
    }

    #[test]
    fn test_corner_alignments_keep_margin() {
        assert_eq!(
            text_position(Alignment::TopLeft, VIEWPORT, TEXT, PADDING),
            Vec2::new(64.0, 32.0)
        );
        assert_eq!(
            text_position(Alignment::BottomRight, VIEWPORT, TEXT, PADDING),
            Vec2::new(536.0, 548.0)
        );
        assert_eq!(
            text_position(Alignment::Bottom, VIEWPORT, TEXT, PADDING),
            Vec2::new(300.0, 548.0)
        );
    }

    #[test]
    fn test_manual_position_is_used_verbatim() {
        let at = Vec2::new(10.0, 12.0);
        assert_eq!(text_position(Alignment::At(at), VIEWPORT, TEXT, PADDING), at);
    }

    #[test]
    fn test_panel_surrounds_text() {
        let rect = panel_rect(Vec2::new(64.0, 32.0), TEXT, PADDING);
        assert_eq!(rect, Rect::new(32.0, 16.0, 264.0, 52.0));
    }

    #[test]
    fn test_overlay_records_commands() {
        let mut overlay = Overlay::new();
        overlay.centered_text("Options", Vec2::new(400.0, 300.0), 32.0, Vec4::ONE);
        overlay.fill(Rect::new(0.0, 0.0, 10.0, 10.0), Vec4::ZERO);
        assert_eq!(overlay.commands().len(), 2);

        overlay.clear();
        assert!(overlay.is_empty());
    }
}
