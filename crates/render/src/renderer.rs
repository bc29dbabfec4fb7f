use crate::plan::{FramePlan, RenderCommand};

/// Renderer-agnostic interface. All renderers consume a frame plan.
///
/// The renderer executes the plan in order and never mutates program state;
/// everything it needs has already been resolved by the sequencer.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given plan.
    fn render(&self, plan: &FramePlan) -> Self::Output;
}

/// Text renderer: a human-readable listing of a plan's passes.
///
/// Used by the CLI's `plan` command and in tests of the sequencing contract.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, plan: &FramePlan) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame (t={:.3}, passes={}) ===\n",
            plan.time,
            plan.passes.len()
        ));

        for (index, pass) in plan.passes.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", index + 1, pass.kind.name()));
            for command in &pass.commands {
                let line = match command {
                    RenderCommand::Clear { color } => format!(
                        "clear color=({:.2}, {:.2}, {:.2}) depth stencil",
                        color.x, color.y, color.z
                    ),
                    RenderCommand::SetState(change) => format!("set {change}"),
                    RenderCommand::Upload { shader, params } => format!(
                        "upload {shader:?} light=({:.1}, {:.1}, {:.1}) shininess={}",
                        params.light.position.x,
                        params.light.position.y,
                        params.light.position.z,
                        params.shininess
                    ),
                    RenderCommand::Draw(draw) => {
                        let origin = draw.model.w_axis;
                        format!(
                            "draw {:?} with {:?} at ({:.2}, {:.2}, {:.2})",
                            draw.mesh, draw.shader, origin.x, origin.y, origin.z
                        )
                    }
                    RenderCommand::Overlay => "overlay".to_string(),
                };
                out.push_str("   ");
                out.push_str(&line);
                out.push('\n');
            }
        }

        out
    }
}
