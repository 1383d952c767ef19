use bytes::{BufMut, BytesMut};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use huskylens_core::{decode, FrameCodec, V1Command, V1Frame, V2Command, V2Frame};
use huskylens_types::Algorithm;

fn v2_result_frame(keypoints: usize) -> Vec<u8> {
    let mut content = BytesMut::new();
    content.put_i8(1);
    content.put_u8(90);
    for v in [160i16, 120, 40, 30] {
        content.put_i16_le(v);
    }
    content.put_slice(&[4, b'h', b'a', b'n', b'd', 0]);
    for v in 0..keypoints as i16 {
        content.put_i16_le(v);
    }

    V2Frame::with_content(V2Command::ReturnBlock, 0, content.freeze())
        .encode()
        .map(|buf| buf.to_vec())
        .unwrap_or_default()
}

fn bench_v1_frame_decode(c: &mut Criterion) {
    let payload: Vec<u8> = [10i16, 20, 5, 5, 3]
        .iter()
        .flat_map(|v| v.to_le_bytes())
        .collect();
    let encoded = V1Frame::with_payload(V1Command::ReturnBlock, payload)
        .encode()
        .map(|buf| buf.to_vec())
        .unwrap_or_default();

    c.bench_function("v1_block_decode", |b| {
        b.iter(|| {
            let frame = V1Frame::decode(black_box(&encoded));
            black_box(frame.and_then(|frame| decode::decode_v1(&frame)))
        });
    });
}

fn bench_v2_result_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("v2_result_decode");
    for keypoints in [0usize, 10, 42] {
        let encoded = v2_result_frame(keypoints);
        group.bench_with_input(
            BenchmarkId::from_parameter(keypoints),
            &encoded,
            |b, encoded| {
                b.iter(|| {
                    let frame = V2Frame::decode(black_box(encoded));
                    black_box(
                        frame.and_then(|frame| {
                            decode::decode_v2(&frame, Algorithm::HandRecognition)
                        }),
                    )
                });
            },
        );
    }
    group.finish();
}

fn bench_request_encode(c: &mut Criterion) {
    let mut codec = FrameCodec::new();
    c.bench_function("v2_get_result_encode", |b| {
        b.iter(|| {
            let len = codec
                .encode_v2(V2Command::GetResult, black_box(3), &[])
                .map(|bytes| bytes.len());
            black_box(len)
        });
    });
}

criterion_group!(
    benches,
    bench_v1_frame_decode,
    bench_v2_result_decode,
    bench_request_encode
);
criterion_main!(benches);
