use common::frame::{encode_frame, FrameBuffer, Panel, Region, FULL_BRIGHTNESS};

const W: usize = 24;
const H: usize = 24;

#[test]
fn test_quadrants_partition_grid() {
    let regions: Vec<Region> = Panel::quadrants()
        .into_iter()
        .map(|panel| panel.region(W, H))
        .collect();

    for region in &regions {
        assert_eq!(region.cell_count(), 12 * 12);
    }

    // Every cell is covered by exactly one quadrant.
    for x in 0 .. W {
        for y in 0 .. H {
            let owners = regions.iter().filter(|r| r.contains(x, y)).count();
            assert_eq!(owners, 1, "cell ({x},{y}) covered by {owners} quadrants");
        }
    }
}

#[test]
fn test_all_off_region_is_empty() {
    let region = Panel::AllOff.region(W, H);
    assert!(region.is_empty());
    assert_eq!(region.cell_count(), 0);
}

#[test]
fn test_all_on_region_is_full_grid() {
    assert_eq!(Panel::AllOn.region(W, H).cell_count(), W * H);
}

#[test]
fn test_panel_index_roundtrip() {
    for index in [1, 2, 3, 4, -1] {
        assert_eq!(Panel::from_index(index).index(), index);
    }
    // Everything else selects the full-on panel.
    assert_eq!(Panel::from_index(0), Panel::AllOn);
    assert_eq!(Panel::from_index(5), Panel::AllOn);
    assert_eq!(Panel::from_index(-7), Panel::AllOn);
}

#[test]
fn test_fill_region_overwrites_whole_grid() {
    let mut frame = FrameBuffer::new(W, H);
    frame.paint(Panel::TopLeft);
    // Painting another panel darkens the first; fills are not additive.
    frame.paint(Panel::BottomRight);

    let top_left = Panel::TopLeft.region(W, H);
    let bottom_right = Panel::BottomRight.region(W, H);
    for x in 0 .. W {
        for y in 0 .. H {
            let expected = if bottom_right.contains(x, y) {
                FULL_BRIGHTNESS
            } else {
                0
            };
            assert_eq!(frame.get(x, y), expected);
            assert!(!top_left.contains(x, y) || frame.get(x, y) == 0 || bottom_right.contains(x, y));
        }
    }
}

#[test]
fn test_paint_all_off_clears() {
    let mut frame = FrameBuffer::new(W, H);
    frame.paint(Panel::AllOn);
    assert!(frame.as_slice().iter().all(|&cell| cell == FULL_BRIGHTNESS));

    frame.paint(Panel::AllOff);
    assert!(frame.as_slice().iter().all(|&cell| cell == 0));
}

#[test]
fn test_encode_frame_matches_grid() {
    let mut frame = FrameBuffer::new(W, H);
    frame.paint(Panel::TopRight);

    let data = encode_frame(&frame, W, H).unwrap();
    assert_eq!(data.len(), W * H);

    let region = Panel::TopRight.region(W, H);
    for x in 0 .. W {
        for y in 0 .. H {
            let expected = if region.contains(x, y) {
                FULL_BRIGHTNESS
            } else {
                0
            };
            assert_eq!(data[x * W + y], expected, "cell ({x},{y})");
        }
    }
}

#[test]
fn test_encode_frame_dimension_mismatch() {
    let frame = FrameBuffer::new(W, H);
    assert!(encode_frame(&frame, W, H).is_ok());
    assert!(encode_frame(&frame, 12, 12).is_err());
    assert!(encode_frame(&frame, W, H + 1).is_err());
}

#[test]
fn test_set_get() {
    let mut frame = FrameBuffer::new(W, H);
    frame.set(3, 7, 128);
    assert_eq!(frame.get(3, 7), 128);
    assert_eq!(frame.get(7, 3), 0);

    let data = encode_frame(&frame, W, H).unwrap();
    assert_eq!(data[3 * W + 7], 128);
}
