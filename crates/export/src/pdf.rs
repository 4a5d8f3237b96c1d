//! PDF serialization of laid-out pages.
//!
//! Output carries no generated ids or creation dates, so identical pages and
//! fonts always produce identical bytes. Content streams are left
//! uncompressed.
//!
//! Embedded fonts draw glyph ids, so they carry a `/ToUnicode` map built from
//! the text on the pages; that keeps the document's text extractable.

use pdf_writer::types::{CidFontType, FontFlags, SystemInfo, UnicodeCmap};
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::fonts::{FontSet, BOLD_RESOURCE, REGULAR_RESOURCE};
use crate::layout::{Page, PageGeometry};

const PRODUCER: &str = "dost";

pub fn write_pdf(
    pages: &[Page],
    geometry: &PageGeometry,
    fonts: &FontSet<'_>,
    title: &str,
) -> Vec<u8> {
    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let tree_id = alloc.bump();
    let info_id = alloc.bump();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.document_info(info_id)
        .title(TextStr(title))
        .producer(TextStr(PRODUCER));

    let font_refs = write_fonts(&mut pdf, &mut alloc, fonts, pages);
    let media_box = Rect::new(0.0, 0.0, geometry.width, geometry.height);

    let mut page_ids = Vec::with_capacity(pages.len());
    for page in pages {
        let page_id = alloc.bump();
        let content_id = alloc.bump();
        page_ids.push(page_id);

        let mut writer = pdf.page(page_id);
        writer.media_box(media_box);
        writer.parent(tree_id);
        writer.contents(content_id);
        let mut resources = writer.resources();
        let mut font_dict = resources.fonts();
        for &(name, id) in &font_refs {
            font_dict.pair(Name(name), id);
        }
        font_dict.finish();
        resources.finish();
        writer.finish();

        pdf.stream(content_id, &page_content(page, fonts));
    }

    pdf.pages(tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    pdf.finish()
}

fn write_fonts(
    pdf: &mut Pdf,
    alloc: &mut Ref,
    fonts: &FontSet<'_>,
    pages: &[Page],
) -> Vec<(&'static [u8], Ref)> {
    match fonts {
        FontSet::Builtin => {
            let regular = alloc.bump();
            let bold = alloc.bump();
            pdf.type1_font(regular)
                .base_font(Name(b"Helvetica"))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            pdf.type1_font(bold)
                .base_font(Name(b"Helvetica-Bold"))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
            vec![(REGULAR_RESOURCE, regular), (BOLD_RESOURCE, bold)]
        }
        FontSet::Embedded(font) => {
            let type0_id = alloc.bump();
            let cid_id = alloc.bump();
            let descriptor_id = alloc.bump();
            let file_id = alloc.bump();
            let cmap_id = alloc.bump();
            let base = Name(font.base_name.as_bytes());

            pdf.type0_font(type0_id)
                .base_font(base)
                .encoding_predefined(Name(b"Identity-H"))
                .descendant_font(cid_id)
                .to_unicode(cmap_id);

            let mut cid = pdf.cid_font(cid_id);
            cid.subtype(CidFontType::Type2);
            cid.base_font(base);
            cid.system_info(SystemInfo {
                registry: Str(b"Adobe"),
                ordering: Str(b"Identity"),
                supplement: 0,
            });
            cid.font_descriptor(descriptor_id);
            cid.default_width(0.0);
            cid.cid_to_gid_map_predefined(Name(b"Identity"));
            cid.widths().consecutive(0, font.glyph_widths());
            cid.finish();

            pdf.font_descriptor(descriptor_id)
                .name(base)
                .flags(FontFlags::SYMBOLIC)
                .bbox(font.bbox())
                .italic_angle(0.0)
                .ascent(font.ascent())
                .descent(font.descent())
                .cap_height(font.cap_height())
                .stem_v(80.0)
                .font_file2(file_id);

            pdf.stream(file_id, font.data)
                .pair(Name(b"Length1"), font.data.len() as i32);

            let drawn = pages
                .iter()
                .flat_map(|page| &page.lines)
                .flat_map(|line| &line.fragments)
                .map(|fragment| fragment.text.as_str());
            let mut cmap = UnicodeCmap::new(
                Name(b"Dost-UCS"),
                SystemInfo {
                    registry: Str(b"Adobe"),
                    ordering: Str(b"UCS"),
                    supplement: 0,
                },
            );
            for (glyph, ch) in font.unicode_map(drawn) {
                cmap.pair(glyph, ch);
            }
            pdf.cmap(cmap_id, &cmap.finish());

            vec![(REGULAR_RESOURCE, type0_id)]
        }
    }
}

fn page_content(page: &Page, fonts: &FontSet<'_>) -> Vec<u8> {
    let mut content = Content::new();
    content.begin_text();
    for line in &page.lines {
        for fragment in &line.fragments {
            let style = &fragment.style;
            content.set_font(Name(fonts.resource_name(style.weight)), style.size);
            content.set_fill_gray(style.gray);
            content.set_text_matrix([1.0, 0.0, 0.0, 1.0, fragment.x, line.baseline]);
            content.show(Str(&fonts.encode(&fragment.text)));
        }
    }
    content.end_text();
    content.finish()
}
