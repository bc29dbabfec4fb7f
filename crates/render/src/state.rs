//! Fixed-function GPU state as a small, pure state machine.
//!
//! Draw ordering in a frame depends on the depth/stencil/blend state left by
//! earlier passes, so the state is tracked explicitly and replayed in tests
//! instead of being implied by imperative driver calls.

use std::fmt;

/// Depth/stencil comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunc {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

/// What to do with the stored stencil value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StencilOp {
    Keep,
    Zero,
    Replace,
    Invert,
}

/// Stencil test: `(reference & read_mask) <compare> (stored & read_mask)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilFunc {
    pub compare: CompareFunc,
    pub reference: u8,
    pub read_mask: u8,
}

impl StencilFunc {
    pub const fn new(compare: CompareFunc, reference: u8, read_mask: u8) -> Self {
        Self {
            compare,
            reference,
            read_mask,
        }
    }
}

/// Stencil update on (stencil fail, depth fail, both pass).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StencilOps {
    pub stencil_fail: StencilOp,
    pub depth_fail: StencilOp,
    pub pass: StencilOp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CullFace {
    Front,
    Back,
}

/// A single state transition issued between draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateChange {
    Blend(bool),
    DepthTest(bool),
    DepthFunc(CompareFunc),
    StencilFunc(StencilFunc),
    StencilMask(u8),
}

/// The complete fixed-function state a draw is issued under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GpuState {
    pub depth_test: bool,
    pub depth_func: CompareFunc,
    pub stencil_test: bool,
    pub stencil_func: StencilFunc,
    pub stencil_ops: StencilOps,
    pub stencil_write_mask: u8,
    pub blend: bool,
    pub blend_func: (BlendFactor, BlendFactor),
    pub cull_face: Option<CullFace>,
}

impl Default for GpuState {
    /// Driver defaults: every test off, stencil passes and keeps.
    fn default() -> Self {
        Self {
            depth_test: false,
            depth_func: CompareFunc::Less,
            stencil_test: false,
            stencil_func: StencilFunc::new(CompareFunc::Always, 0, 0xFF),
            stencil_ops: StencilOps {
                stencil_fail: StencilOp::Keep,
                depth_fail: StencilOp::Keep,
                pass: StencilOp::Keep,
            },
            stencil_write_mask: 0xFF,
            blend: false,
            blend_func: (BlendFactor::One, BlendFactor::Zero),
            cull_face: None,
        }
    }
}

impl GpuState {
    /// State configured once at startup, before the first frame.
    pub fn scene() -> Self {
        Self {
            depth_test: true,
            stencil_test: true,
            stencil_ops: StencilOps {
                stencil_fail: StencilOp::Keep,
                depth_fail: StencilOp::Keep,
                pass: StencilOp::Replace,
            },
            blend_func: (BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha),
            cull_face: Some(CullFace::Front),
            ..Self::default()
        }
    }

    pub fn apply(&mut self, change: StateChange) {
        match change {
            StateChange::Blend(on) => self.blend = on,
            StateChange::DepthTest(on) => self.depth_test = on,
            StateChange::DepthFunc(func) => self.depth_func = func,
            StateChange::StencilFunc(func) => self.stencil_func = func,
            StateChange::StencilMask(mask) => self.stencil_write_mask = mask,
        }
    }

    /// Everything that must be baked into a pipeline object. The stencil
    /// reference is dynamic, so it is zeroed out.
    pub fn pipeline_key(&self) -> GpuState {
        let mut key = *self;
        key.stencil_func.reference = 0;
        key
    }
}

impl fmt::Display for CompareFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Never => "NEVER",
            Self::Less => "LESS",
            Self::Equal => "EQUAL",
            Self::LessEqual => "LEQUAL",
            Self::Greater => "GREATER",
            Self::NotEqual => "NOTEQUAL",
            Self::GreaterEqual => "GEQUAL",
            Self::Always => "ALWAYS",
        };
        f.write_str(name)
    }
}

impl fmt::Display for StateChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blend(on) => write!(f, "blend={on}"),
            Self::DepthTest(on) => write!(f, "depth_test={on}"),
            Self::DepthFunc(func) => write!(f, "depth_func={func}"),
            Self::StencilFunc(s) => write!(
                f,
                "stencil_func={} ref={} mask={:#04x}",
                s.compare, s.reference, s.read_mask
            ),
            Self::StencilMask(mask) => write!(f, "stencil_mask={mask:#04x}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scene_state_enables_depth_and_stencil() {
        let s = GpuState::scene();
        assert!(s.depth_test);
        assert!(s.stencil_test);
        assert!(!s.blend);
        assert_eq!(s.depth_func, CompareFunc::Less);
        assert_eq!(s.stencil_ops.pass, StencilOp::Replace);
        assert_eq!(s.cull_face, Some(CullFace::Front));
    }

    #[test]
    fn apply_changes_one_field() {
        let mut s = GpuState::scene();
        s.apply(StateChange::DepthFunc(CompareFunc::LessEqual));
        assert_eq!(s.depth_func, CompareFunc::LessEqual);
        assert!(s.depth_test);

        s.apply(StateChange::StencilFunc(StencilFunc::new(CompareFunc::NotEqual, 1, 0xFF)));
        s.apply(StateChange::StencilMask(0x00));
        assert_eq!(s.stencil_func.compare, CompareFunc::NotEqual);
        assert_eq!(s.stencil_write_mask, 0);
    }

    #[test]
    fn pipeline_key_ignores_reference() {
        let mut a = GpuState::scene();
        let mut b = GpuState::scene();
        a.apply(StateChange::StencilFunc(StencilFunc::new(CompareFunc::Always, 1, 0xFF)));
        b.apply(StateChange::StencilFunc(StencilFunc::new(CompareFunc::Always, 0, 0xFF)));
        assert_ne!(a, b);
        assert_eq!(a.pipeline_key(), b.pipeline_key());
    }

    #[test]
    fn state_change_display() {
        let s = StateChange::StencilFunc(StencilFunc::new(CompareFunc::NotEqual, 1, 0xFF));
        assert_eq!(s.to_string(), "stencil_func=NOTEQUAL ref=1 mask=0xff");
        assert_eq!(StateChange::StencilMask(0).to_string(), "stencil_mask=0x00");
    }
}
