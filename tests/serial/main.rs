//! Integration tests for Layer 3: Serialization
//!
//! Tests for snapshots, create and merge replay, and the byte codec.


use cairn_foundation::{Component, FieldSink, Result};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Component for Health {
    const NAME: &'static str = "game:Health";

    fn fields(&mut self, sink: &mut FieldSink<'_>) -> Result<()> {
        sink.field("current", &mut self.current)?;
        sink.field("max", &mut self.max)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Name(pub String);

impl Component for Name {
    const NAME: &'static str = "game:Name";

    fn fields(&mut self, sink: &mut FieldSink<'_>) -> Result<()> {
        sink.field("value", &mut self.0)
    }
}

pub fn health(current: i32, max: i32) -> Health {
    Health { current, max }
}
