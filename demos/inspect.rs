//! Build a small settings window, lay it out and print the native tree.
//!
//! Run with: cargo run --example inspect

use spark_bind::{
    Element, LayoutSettings, Rgba, build, compute_layout, create_canvas, set_layout_settings,
    visual, write_tree,
};

fn main() -> spark_bind::Result<()> {
    let mut settings = LayoutSettings::default();
    settings.merge_with_env();
    set_layout_settings(settings);

    let speed = Element::float_slider("Speed", 2.5, 0.0, 10.0);
    let advanced = Element::fold(
        "Advanced",
        vec![
            Element::int_field("Retries", 3),
            Element::indent(1, vec![Element::bool_field("Verbose", false)]),
        ],
    )
    .opened();

    let window = Element::window(
        "Settings",
        vec![
            Element::text_field("Name", "spark"),
            Element::color_field("Tint", Rgba::rgb(80, 160, 255)),
            speed.clone(),
            Element::dropdown("Mode", &["Fast", "Balanced", "Slow"], 1),
            Element::int_min_max_slider("Range", (20, 80), 0, 100),
            advanced,
            Element::popup_menu(Element::label("Presets"), &["Default", "Compact"], |_| {}),
            Element::row(vec![Element::space(), Element::button("Apply", || {})]),
        ],
    );

    let canvas = create_canvas(480.0, 320.0);
    let root = build(&window)?;
    visual::append_child(canvas, root)?;
    compute_layout(canvas, 480.0, 320.0)?;

    let mut stdout = std::io::stdout();
    write_tree(canvas, &mut stdout)?;

    // Value changes rewrite the existing input node in place.
    speed.set_value(7.25)?;
    compute_layout(canvas, 480.0, 320.0)?;
    println!();
    write_tree(canvas, &mut stdout)?;

    Ok(())
}
