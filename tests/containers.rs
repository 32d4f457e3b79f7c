use byteorder::{BigEndian, ByteOrder, LittleEndian};
use png2icons::{Algorithm, ConvertOptions, Converter, ICNS_ICON_TYPES,
                ICO_SIZES, IconFamily, IconType, IcoFormat, OutputFormat,
                packbits};
use std::io::Cursor;

/// Encodes an opaque RGB gradient as a PNG file.
fn rgb_png(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            data.push((x * 255 / width) as u8);
            data.push((y * 255 / height) as u8);
            data.push(128);
        }
    }
    let mut output = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut output, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().expect("failed to write header");
        writer.write_image_data(&data).expect("failed to write image data");
        writer.finish().expect("failed to finish PNG");
    }
    output
}

fn png_size(data: &[u8]) -> (u32, u32) {
    let decoder = png::Decoder::new(Cursor::new(data));
    let reader = decoder.read_info().expect("failed to read PNG entry");
    let info = reader.info();
    (info.width, info.height)
}

/// Checks ICO framing and returns each entry's (size byte, payload).
fn ico_entries(output: &[u8]) -> Vec<(u8, &[u8])> {
    assert_eq!(&output[..4], b"\x00\x00\x01\x00");
    let count = LittleEndian::read_u16(&output[4..6]) as usize;
    assert_eq!(count, ICO_SIZES.len());
    let mut expected_offset = 6 + 16 * count;
    let mut entries = Vec::new();
    for index in 0..count {
        let entry = &output[6 + 16 * index..6 + 16 * (index + 1)];
        assert_eq!(entry[0], entry[1]);
        assert_eq!(LittleEndian::read_u16(&entry[4..6]), 1);
        assert_eq!(LittleEndian::read_u16(&entry[6..8]), 32);
        let size = LittleEndian::read_u32(&entry[8..12]) as usize;
        let offset = LittleEndian::read_u32(&entry[12..16]) as usize;
        assert_eq!(offset, expected_offset);
        expected_offset += size;
        entries.push((entry[0], &output[offset..offset + size]));
    }
    assert_eq!(expected_offset, output.len());
    entries
}

#[test]
fn icns_framing_and_read_back() {
    let input = rgb_png(40, 20);
    let output = png2icons::create_icns(&input,
                                        Algorithm::NearestNeighbor,
                                        0,
                                        None)
        .expect("conversion failed");
    assert_eq!(&output[..4], b"icns");
    assert_eq!(BigEndian::read_u32(&output[4..8]) as usize, output.len());

    let family = IconFamily::read(Cursor::new(&output)).expect("read failed");
    assert_eq!(family.elements.len(), ICNS_ICON_TYPES.len());
    for (element, &icon_type) in family.elements.iter().zip(ICNS_ICON_TYPES.iter()) {
        assert_eq!(element.icon_type(), Some(icon_type));
        if icon_type.encoding() == png2icons::Encoding::PNG {
            let size = icon_type.pixel_size();
            assert_eq!(png_size(element.data()), (size, size));
        }
    }
    assert!(family.has_icon_with_type(IconType::RGB24_16x16));
    assert!(family.has_icon_with_type(IconType::RGB24_32x32));
}

#[test]
fn icns_masks_cover_padding() {
    let input = rgb_png(40, 20);
    let output = png2icons::create_icns(&input,
                                        Algorithm::NearestNeighbor,
                                        0,
                                        None)
        .expect("conversion failed");
    let family = IconFamily::read(Cursor::new(&output)).expect("read failed");

    // The 40x20 input is padded to 40x40 with ten transparent rows above
    // and below; at 16x16 that leaves rows 4 to 11 opaque.
    let mask = family.find_element(IconType::Mask8_16x16.ostype())
        .expect("missing mask")
        .data();
    assert_eq!(mask.len(), 256);
    assert!(mask[..64].iter().all(|&alpha| alpha == 0));
    assert!(mask[64..192].iter().all(|&alpha| alpha == 255));
    assert!(mask[192..].iter().all(|&alpha| alpha == 0));

    let argb = family.find_element(IconType::ARGB32_16x16.ostype())
        .expect("missing ic04")
        .decode_planes()
        .expect("bad ic04 planes");
    assert_eq!(argb.len(), 4);
    assert_eq!(argb[0], mask);

    let rgb = family.find_element(IconType::RGB24_16x16.ostype())
        .expect("missing is32")
        .decode_planes()
        .expect("bad is32 planes");
    assert_eq!(rgb.len(), 3);
    assert_eq!(&rgb[..], &argb[1..]);
    // The blue channel of the opaque rows is constant.
    assert!(rgb[2][64..192].iter().all(|&blue| blue == 128));
}

#[test]
fn ico_bmp_entries() {
    let input = rgb_png(30, 30);
    let output = png2icons::create_ico(&input,
                                       Algorithm::Bicubic,
                                       0,
                                       IcoFormat::BMP,
                                       None)
        .expect("conversion failed");
    for ((size_byte, payload), &size) in ico_entries(&output)
        .into_iter()
        .zip(ICO_SIZES.iter()) {
        assert_eq!(size_byte, if size == 256 { 0 } else { size as u8 });
        assert_eq!(LittleEndian::read_u32(&payload[..4]), 40);
        assert_eq!(LittleEndian::read_i32(&payload[4..8]), size as i32);
        assert_eq!(LittleEndian::read_i32(&payload[8..12]), 2 * size as i32);
        assert_eq!(payload.len(),
                   40 + png2icons::bmp::color_length(size, size) +
                   png2icons::bmp::mask_length(size, size));
    }
}

#[test]
fn ico_png_entries() {
    let input = rgb_png(64, 48);
    let options = ConvertOptions {
        format: OutputFormat::IcoPng,
        algorithm: Algorithm::Bicubic2,
        colors: 0,
    };
    let output = png2icons::convert(&input, &options, None)
        .expect("conversion failed");
    for ((_, payload), &size) in ico_entries(&output)
        .into_iter()
        .zip(ICO_SIZES.iter()) {
        assert_eq!(png_size(payload), (size, size));
    }
}

#[test]
fn ico_for_executable_entries() {
    let input = rgb_png(20, 33);
    let output = png2icons::create_ico(&input,
                                       Algorithm::Hermite,
                                       64,
                                       IcoFormat::ForExecutable,
                                       None)
        .expect("conversion failed");
    for ((_, payload), &size) in ico_entries(&output)
        .into_iter()
        .zip(ICO_SIZES.iter()) {
        if size < 64 {
            assert_eq!(LittleEndian::read_u32(&payload[..4]), 40);
        } else {
            assert_eq!(png_size(payload), (size, size));
        }
    }
}

#[test]
fn converter_output_is_stable_across_calls() {
    let input = rgb_png(25, 25);
    let mut converter = Converter::new();
    let options = ConvertOptions {
        format: OutputFormat::IcoForExecutable,
        algorithm: Algorithm::Bezier,
        colors: 0,
    };
    let first = converter.convert(&input, &options).expect("first failed");
    let second = converter.convert(&input, &options).expect("second failed");
    assert_eq!(first, second);
    converter.clear_cache();
    let third = converter.convert(&input, &options).expect("third failed");
    assert_eq!(first, third);
}

#[test]
fn packbits_tail_records_decode() {
    // Streams ending in one or two bytes that do not form a repeat run.
    for data in [&[1u8][..], &[1, 2][..], &[5, 5, 5, 5, 9][..], &[5, 5, 5, 5, 9, 9][..]] {
        let encoded = packbits::encode(data);
        assert_eq!(packbits::decode(&encoded).expect("decode failed"), data);
    }
}

#[test]
fn invalid_input_fails_every_format() {
    for format in [OutputFormat::Icns,
                   OutputFormat::IcoBmp,
                   OutputFormat::IcoPng,
                   OutputFormat::IcoForExecutable] {
        let options = ConvertOptions {
            format: format,
            ..ConvertOptions::default()
        };
        assert!(png2icons::convert(b"\x89PNG\r\n\x1a\n", &options, None)
            .is_none());
    }
}
