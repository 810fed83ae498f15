//! Encoding benchmarks for zercord
//!
//! Measures the varint primitive and whole-record write/read throughput,
//! the hot paths of every serialization call.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use zercord::encoding::varint::{decode_varint, encode_varint, MAX_VARINT_LEN};
use zercord::{read, write, Decoder, Encoder, FieldDefinition, Schema, TypeTag, Wire};

#[derive(Debug, Default, PartialEq)]
struct Event {
    id: u64,
    kind: String,
    payload: Vec<u32>,
}

impl Wire for Event {
    const TAG: TypeTag = TypeTag::Struct;

    fn encode(&self, enc: &mut Encoder<'_>) -> zercord::Result<()> {
        let mut s = enc.begin_struct(3)?;
        s.field("id", &self.id)?;
        s.field("kind", &self.kind)?;
        s.field("payload", &self.payload)?;
        s.finish()
    }

    fn decode(dec: &mut Decoder<'_, '_>, wire: TypeTag) -> zercord::Result<Self> {
        let mut s = dec.read_struct(wire)?;
        let id = s.field("id")?;
        let kind = s.field("kind")?;
        let payload = s.field("payload")?;
        s.finish()?;
        Ok(Self { id, kind, payload })
    }
}

fn event_schema() -> Schema {
    Schema::new("event", 1)
        .with_field(FieldDefinition::new("id", TypeTag::U64))
        .with_field(FieldDefinition::new("kind", TypeTag::String))
        .with_field(FieldDefinition::new("payload", TypeTag::Array))
}

fn bench_varint(c: &mut Criterion) {
    let mut group = c.benchmark_group("varint");

    let test_values: Vec<(u64, &str)> = vec![
        (0, "zero"),
        (127, "1_byte_max"),
        (16383, "2_byte_max"),
        (u32::MAX as u64, "u32_max"),
        (u64::MAX, "u64_max"),
    ];

    for (value, name) in &test_values {
        group.bench_with_input(BenchmarkId::new("encode", name), value, |b, &value| {
            let mut buf = [0u8; MAX_VARINT_LEN];
            b.iter(|| {
                let mut pos = 0;
                encode_varint(black_box(value), &mut buf, &mut pos).unwrap();
                black_box(pos)
            });
        });
    }

    for (value, name) in &test_values {
        let mut buf = [0u8; MAX_VARINT_LEN];
        let mut len = 0;
        encode_varint(*value, &mut buf, &mut len).unwrap();
        group.bench_with_input(BenchmarkId::new("decode", name), &buf, |b, buf| {
            b.iter(|| {
                let mut pos = 0;
                black_box(decode_varint(black_box(buf), &mut pos, MAX_VARINT_LEN).unwrap())
            });
        });
    }

    group.finish();
}

fn bench_record(c: &mut Criterion) {
    let mut group = c.benchmark_group("record");

    let schema = event_schema();
    let event = Event {
        id: 0xDEAD_BEEF,
        kind: "sensor.telemetry.update".to_owned(),
        payload: (0..64).collect(),
    };

    group.bench_function("write", |b| {
        let mut buf = [0u8; 1024];
        b.iter(|| black_box(write(black_box(&event), &mut buf, &schema).unwrap()));
    });

    let mut buf = [0u8; 1024];
    let written = write(&event, &mut buf, &schema).unwrap();
    group.bench_function("read", |b| {
        b.iter(|| black_box(read::<Event>(black_box(&buf[..written]), &schema).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_varint, bench_record);
criterion_main!(benches);
