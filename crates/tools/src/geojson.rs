//! GeoJSON export of encoded flows.

use flows::{EncodedFlows, Geometry, Graphic, Symbol};
use serde_json::{Value, json};

fn geometry(g: &Geometry) -> Value {
    match g {
        Geometry::Polyline { paths, .. } if paths.len() == 1 => json!({
            "type": "LineString",
            "coordinates": paths[0],
        }),
        Geometry::Polyline { paths, .. } => json!({
            "type": "MultiLineString",
            "coordinates": paths,
        }),
        Geometry::Point { x, y, .. } => json!({
            "type": "Point",
            "coordinates": [x, y],
        }),
    }
}

/// Flat style properties for generic GeoJSON viewers.
fn style(symbol: &Symbol) -> Value {
    match symbol {
        Symbol::SimpleLine { color, width } => json!({
            "stroke": color.to_css(),
            "stroke-width": width,
        }),
        Symbol::SimpleMarker { color, size, outline } => json!({
            "marker-color": color.to_css(),
            "marker-size": size,
            "stroke": outline.map(|o| o.color.to_css()),
            "stroke-width": outline.map(|o| o.width),
        }),
        Symbol::SimpleFill { color, outline } => json!({
            "fill": color.to_css(),
            "stroke": outline.map(|o| o.color.to_css()),
        }),
    }
}

fn feature(graphic: &Graphic, kind: &str) -> Value {
    let popup = graphic.rendered_popup();
    let record = &graphic.attributes;
    json!({
        "type": "Feature",
        "geometry": geometry(&graphic.geometry),
        "properties": {
            "kind": kind,
            "o_cz": record.o_cz,
            "d_cz": record.d_cz,
            "n": record.n,
            "style": style(&graphic.symbol),
            "symbol": graphic.symbol,
            "title": popup.title,
            "popup": popup.content,
        },
    })
}

pub fn feature_collection(flows: &EncodedFlows) -> Value {
    let features: Vec<Value> = flows
        .lines
        .iter()
        .map(|g| feature(g, "flow"))
        .chain(flows.points.iter().map(|g| feature(g, "stayer")))
        .collect();
    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

#[cfg(test)]
mod tests {
    use super::feature_collection;
    use flows::{EncodedFlows, MigrationRecord, encode};
    use foundation::ZoneId;

    fn record(o: i64, d: i64, n: u64, name: &str) -> MigrationRecord {
        MigrationRecord {
            n: Some(n),
            o_cz_name: Some(name.to_string()),
            o_state_name: Some("ST".to_string()),
            d_cz_name: Some("Dest".to_string()),
            d_state_name: Some("DS".to_string()),
            o_x_coord: Some(-90.0),
            o_y_coord: Some(40.0),
            d_x_coord: Some(-80.0),
            d_y_coord: Some(35.0),
            ..MigrationRecord::new(ZoneId(o), ZoneId(d))
        }
    }

    #[test]
    fn exports_lines_then_points_with_expanded_popups() {
        let flows = encode(&[record(1, 2, 600, "Alpha"), record(1, 1, 9400, "Alpha")], 500.0);
        let fc = feature_collection(&flows);
        let features = fc["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);

        let line = &features[0];
        assert_eq!(line["geometry"]["type"], "LineString");
        assert_eq!(line["geometry"]["coordinates"][1][0], -80.0);
        assert_eq!(line["properties"]["kind"], "flow");
        assert_eq!(line["properties"]["title"], "Alpha, ST → Dest, DS");
        assert_eq!(line["properties"]["symbol"]["type"], "simple-line");

        let point = &features[1];
        assert_eq!(point["geometry"]["type"], "Point");
        assert_eq!(point["properties"]["kind"], "stayer");
        assert_eq!(point["properties"]["n"], 9400);
        assert!(point["properties"]["style"]["marker-size"].as_f64().unwrap() >= 8.0);
    }

    #[test]
    fn empty_flows_export_an_empty_collection() {
        let fc = feature_collection(&EncodedFlows::default());
        assert_eq!(fc["type"], "FeatureCollection");
        assert!(fc["features"].as_array().unwrap().is_empty());
    }
}
