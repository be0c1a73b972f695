//--------------------------------------------------------------------
// main.rs
//--------------------------------------------------------------------
// Provides the main function: reads a list of sites, one "x y" pair
// per line, and prints a summary of their Voronoi diagram
//--------------------------------------------------------------------

extern crate voronoi_fortune;

use std::io::prelude::*;
use std::io;
use voronoi_fortune::{Site, Vec2, Coord};

fn parse_sites(text: &str) -> Result<Vec<Site<usize>>, String> {
    let mut sites = Vec::new();

    for (number, line) in text.lines().enumerate().map(|(i, l)| (i + 1, l.trim())) {
        if line.is_empty() || line.starts_with('#') { continue; }

        let coords = line.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<Coord>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| format!("line {}: {}", number, e))?;

        match coords.as_slice() {
            &[x, y] if x.is_finite() && y.is_finite() => sites.push(Site::new(Vec2::new(x, y), number)),
            _ => return Err(format!("line {}: expected two finite coordinates", number))
        }
    }

    Ok(sites)
}

fn main() {
    print!("Enter address of the site list file: ");
    io::stdout().flush().unwrap();

    let mut path = String::new();
    io::stdin().read_line(&mut path).unwrap();
    let text = std::fs::read_to_string(path.trim()).unwrap();

    let sites = match parse_sites(&text) {
        Ok(sites) => sites,
        Err(err) => { eprintln!("Invalid site list: {}", err); return; }
    };

    let then = std::time::Instant::now();
    let dcel = match voronoi_fortune::compute_voronoi_diagram(sites) {
        Ok(dcel) => dcel,
        Err(err) if err.is_fatal() => { eprintln!("Internal error while computing the diagram: {}", err); return; }
        Err(err) => { eprintln!("Failed to compute the diagram: {}", err); return; }
    };
    let now = std::time::Instant::now();
    println!("Total computation time: {:?}", now.duration_since(then));
    println!();

    println!("{} sites, {} vertices, {} edges", dcel.faces().len(), dcel.vertices().len(), dcel.edge_count());
    for (i, vertex) in dcel.vertices().iter().enumerate() {
        println!("Vertex {}: {}", i, vertex.position);
    }

    for (i, face) in dcel.faces().iter().enumerate() {
        let neighbors = dcel.adjacent_faces(i).into_iter()
            .map(|f| dcel.faces()[f].user_data.to_string())
            .collect::<Vec<_>>();
        println!("Site at line {} {}: {}, neighbors at lines [{}]", face.user_data, face.site,
            if dcel.is_bounded(i) { "bounded" } else { "unbounded" }, neighbors.join(", "));
    }
}
