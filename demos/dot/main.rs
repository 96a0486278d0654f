//! Prints the classified route graph of a canned solver dump.
//!
//! I use it with `cargo run --example dot | neato -Tsvg > routes.svg`

use bus_routes::classify;
use bus_routes::input::from_str;
use bus_routes::output::to_dot_str;

fn main() -> bus_routes::Result<()> {
    let dump = "
        christchurch:rolleston=2.5/kaiapoi=3.0/
        rolleston:ashburton=6.0/
        kaiapoi:rangiora=1.5/
        ashburton:timaru=7.5/
        rangiora:
        christchurch-rolleston-ashburton-timaru
        ";

    let decoded = from_str(dump.trim())?;
    let graph = decoded.graph();
    let classification = classify(&graph, &decoded.route);

    println!("// {}", decoded.route.title());
    print!("{}", to_dot_str(&graph, &classification)?);
    Ok(())
}
