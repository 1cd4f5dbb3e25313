use super::*;

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "irisgate_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn frame_2x1(premultiplied: bool, data: Vec<u8>) -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 1,
        data,
        premultiplied,
    }
}

#[test]
fn in_memory_sink_captures_config_and_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(SinkConfig {
        width: 2,
        height: 1,
    })
    .unwrap();
    let frame = frame_2x1(true, vec![0; 8]);
    sink.push_frame(0, 0.0, &frame).unwrap();
    sink.push_frame(1, 16.0, &frame).unwrap();
    sink.end().unwrap();

    assert_eq!(
        sink.config(),
        Some(SinkConfig {
            width: 2,
            height: 1
        })
    );
    assert_eq!(sink.frames().len(), 2);
    assert_eq!(sink.frames()[1].0, 16.0);

    // A new run resets the capture.
    sink.begin(SinkConfig {
        width: 4,
        height: 4,
    })
    .unwrap();
    assert!(sink.frames().is_empty());
}

#[test]
fn png_sequence_writes_numbered_straight_alpha_files() {
    let dir = temp_dir("png_seq");
    let mut sink = PngSequenceSink::new(&dir);
    sink.begin(SinkConfig {
        width: 2,
        height: 1,
    })
    .unwrap();
    let frame = frame_2x1(true, vec![128, 128, 128, 128, 255, 0, 0, 255]);
    sink.push_frame(0, 0.0, &frame).unwrap();
    sink.push_frame(1, 16.0, &frame).unwrap();
    sink.end().unwrap();

    assert_eq!(sink.written(), 2);
    assert!(dir.join("frame_00000.png").is_file());
    assert!(dir.join("frame_00001.png").is_file());

    // Premultiplied mid-gray at half alpha decodes back to straight white.
    let img = image::open(dir.join("frame_00000.png")).unwrap().to_rgba8();
    assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255, 128]);
    assert_eq!(img.get_pixel(1, 0).0, [255, 0, 0, 255]);

    std::fs::remove_dir_all(&dir).unwrap();
}
