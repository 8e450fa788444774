mod cornell;
mod glass;
mod instancing;

use std::str::FromStr;

use caustica::{Camera, Engine, Params};

pub struct DemoParams;

impl Params for DemoParams {
    type LightHandle = u32;
    type MaterialHandle = u32;
    type PrimitiveHandle = u32;
    type MeshHandle = u32;
    type InstanceHandle = u32;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneKind {
    /// Glass sphere focusing a point light onto a checkered floor.
    Glass,

    /// Closed box with a mirror block and a glass ball.
    Cornell,

    /// Ring of mesh instances.
    Instancing,
}

impl SceneKind {
    /// Populates the engine and returns a camera looking at the scene.
    pub fn build(
        self,
        engine: &mut Engine<DemoParams>,
    ) -> caustica::Result<Camera> {
        match self {
            SceneKind::Glass => glass::build(engine),
            SceneKind::Cornell => cornell::build(engine),
            SceneKind::Instancing => instancing::build(engine),
        }
    }
}

impl FromStr for SceneKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "glass" => Ok(SceneKind::Glass),
            "cornell" => Ok(SceneKind::Cornell),
            "instancing" => Ok(SceneKind::Instancing),
            _ => Err(format!("unknown scene: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build() {
        let kinds =
            [SceneKind::Glass, SceneKind::Cornell, SceneKind::Instancing];

        for kind in kinds {
            let mut engine = Engine::<DemoParams>::new();

            kind.build(&mut engine).unwrap();
            engine.flush();

            assert_eq!(1, engine.version(), "kind={kind:?}");
        }
    }
}
