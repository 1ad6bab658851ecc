use docverter::layout::{layout_text, LayoutConfig};
use docverter::pagesize::HALF_LETTER;
use docverter::{In, Info, PdfRenderer, Pt, StandardFont};

fn main() {
    let text = format!(
        "{}\n\n{}\n{}",
        lipsum::lipsum(8),
        lipsum::lipsum(400),
        lipsum::lipsum(600)
    );

    let config = LayoutConfig::new(HALF_LETTER, In(0.5), Pt(11.0), 1.4).expect("valid layout");
    let renderer = PdfRenderer::new(StandardFont::Helvetica).with_info(
        Info::new()
            .title("Lorem Ipsum")
            .subject("Development Test / Example")
            .clone(),
    );

    let pages = layout_text(&text, config, &renderer.font).expect("can lay out text");
    println!("{} lines over {} pages", pages.line_count(), pages.len());

    let out = std::fs::File::create("lorem-ipsum.pdf").expect("can create output file");
    renderer
        .write(&pages, &config, std::io::BufWriter::new(out))
        .expect("can write pdf");
}
