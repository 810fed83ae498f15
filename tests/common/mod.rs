//! Shared record types for the integration suites.
#![allow(dead_code)]

use zercord::{Decoder, Encoder, Result, TypeTag, Wire};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PersonV1 {
    pub id: u32,
    pub name: String,
}

impl Wire for PersonV1 {
    const TAG: TypeTag = TypeTag::Struct;

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        let mut s = enc.begin_struct(2)?;
        s.field("id", &self.id)?;
        s.field("name", &self.name)?;
        s.finish()
    }

    fn decode(dec: &mut Decoder<'_, '_>, wire: TypeTag) -> Result<Self> {
        let mut s = dec.read_struct(wire)?;
        let id = s.field("id")?;
        let name = s.field("name")?;
        s.finish()?;
        Ok(Self { id, name })
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PersonV2 {
    pub id: u32,
    pub name: String,
    pub age: u32,
    pub email: String,
}

impl Wire for PersonV2 {
    const TAG: TypeTag = TypeTag::Struct;

    fn encode(&self, enc: &mut Encoder<'_>) -> Result<()> {
        let mut s = enc.begin_struct(4)?;
        s.field("id", &self.id)?;
        s.field("name", &self.name)?;
        s.field("age", &self.age)?;
        s.field("email", &self.email)?;
        s.finish()
    }

    fn decode(dec: &mut Decoder<'_, '_>, wire: TypeTag) -> Result<Self> {
        let mut s = dec.read_struct(wire)?;
        let id = s.field("id")?;
        let name = s.field("name")?;
        let age = s.field("age")?;
        let email = s.field("email")?;
        s.finish()?;
        Ok(Self {
            id,
            name,
            age,
            email,
        })
    }
}
