use std::time::Instant;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str};

use crate::error::Error;
use crate::fonts::{Face, register_font, to_winansi_bytes};
use crate::report::{Document, DrawOp, Page};

const PT_PER_MM: f32 = 72.0 / 25.4;
const IMAGE_NAME: &str = "Im1";

/// Serialize a finished report. Layout coordinates are millimetres from the
/// top-left corner; PDF user space is points from the bottom-left.
pub fn render(doc: &Document) -> Result<Vec<u8>, Error> {
    let t0 = Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();

    let font_pairs: Vec<(&str, Ref)> = Face::ALL
        .iter()
        .map(|&face| {
            let font_ref = alloc();
            register_font(&mut pdf, face, font_ref);
            (face.pdf_name(), font_ref)
        })
        .collect();

    let image_ref = embed_png(&mut pdf, &doc.image().png, &mut alloc)?;
    let t_images = t0.elapsed();

    let (page_w, page_h) = doc.page_size();
    let n = doc.pages().len();
    let page_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();
    let content_ids: Vec<Ref> = (0..n).map(|_| alloc()).collect();

    for (i, page) in doc.pages().iter().enumerate() {
        let raw = draw_page(page, page_h).finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(n as i32);

    for i in 0..n {
        let mut page = pdf.page(page_ids[i]);
        page.media_box(Rect::new(0.0, 0.0, page_w * PT_PER_MM, page_h * PT_PER_MM))
            .parent(pages_id)
            .contents(content_ids[i]);
        let mut resources = page.resources();
        {
            let mut fonts = resources.fonts();
            for (name, font_ref) in &font_pairs {
                fonts.pair(Name(name.as_bytes()), *font_ref);
            }
        }
        resources
            .x_objects()
            .pair(Name(IMAGE_NAME.as_bytes()), image_ref);
    }

    log::info!(
        "Render phases: images={:.1}ms, assembly={:.1}ms ({} pages)",
        t_images.as_secs_f64() * 1000.0,
        (t0.elapsed() - t_images).as_secs_f64() * 1000.0,
        n,
    );

    Ok(pdf.finish())
}

/// Embed a PNG as an RGB image XObject, splitting alpha into a soft mask
/// when any pixel is not fully opaque.
fn embed_png(pdf: &mut Pdf, data: &[u8], alloc: &mut impl FnMut() -> Ref) -> Result<Ref, Error> {
    let decoded = image::load_from_memory_with_format(data, image::ImageFormat::Png)?;
    let rgba: image::RgbaImage = decoded.to_rgba8();
    let (w, h) = (rgba.width(), rgba.height());
    let has_alpha = rgba.pixels().any(|p| p.0[3] < 255);

    let rgb_data: Vec<u8> = rgba
        .pixels()
        .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
        .collect();
    let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

    let smask_ref = if has_alpha {
        let alpha_data: Vec<u8> = rgba.pixels().map(|p| p.0[3]).collect();
        let compressed_alpha = miniz_oxide::deflate::compress_to_vec_zlib(&alpha_data, 6);
        let mask_ref = alloc();
        let mut mask = pdf.image_xobject(mask_ref, &compressed_alpha);
        mask.filter(Filter::FlateDecode);
        mask.width(w as i32);
        mask.height(h as i32);
        mask.color_space().device_gray();
        mask.bits_per_component(8);
        Some(mask_ref)
    } else {
        None
    };

    let xobj_ref = alloc();
    let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
    xobj.filter(Filter::FlateDecode);
    xobj.width(w as i32);
    xobj.height(h as i32);
    xobj.color_space().device_rgb();
    xobj.bits_per_component(8);
    if let Some(mask_ref) = smask_ref {
        xobj.s_mask(mask_ref);
    }
    Ok(xobj_ref)
}

fn draw_page(page: &Page, page_h: f32) -> Content {
    let mut content = Content::new();
    let flip = |y: f32| (page_h - y) * PT_PER_MM;

    for op in &page.ops {
        match op {
            DrawOp::Text {
                x,
                y,
                size,
                bold,
                text,
            } => {
                let font = Face::for_weight(*bold).pdf_name();
                content.begin_text();
                content.set_font(Name(font.as_bytes()), *size);
                content.next_line(x * PT_PER_MM, flip(*y));
                content.show(Str(&to_winansi_bytes(text)));
                content.end_text();
            }
            DrawOp::Rule { x1, x2, y } => {
                content.save_state();
                content.set_line_width(0.5);
                content.set_stroke_gray(0.6);
                content.move_to(x1 * PT_PER_MM, flip(*y));
                content.line_to(x2 * PT_PER_MM, flip(*y));
                content.stroke();
                content.restore_state();
            }
            DrawOp::Image {
                x,
                y,
                width,
                height,
            } => {
                content.save_state();
                content.transform([
                    width * PT_PER_MM,
                    0.0,
                    0.0,
                    height * PT_PER_MM,
                    x * PT_PER_MM,
                    flip(y + height),
                ]);
                content.x_object(Name(IMAGE_NAME.as_bytes()));
                content.restore_state();
            }
            DrawOp::Swatch { x, y, size, rgb } => {
                let [r, g, b] = *rgb;
                content.save_state();
                content.set_fill_rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0);
                content.rect(
                    x * PT_PER_MM,
                    flip(y + size),
                    size * PT_PER_MM,
                    size * PT_PER_MM,
                );
                content.fill_nonzero();
                content.restore_state();
            }
        }
    }
    content
}
