//! Geographic to projected coordinate conversion using pure Rust
//! (proj4rs + crs-definitions).
//!
//! Vector input arrives as `(longitude, latitude)` pairs in EPSG:4326;
//! the raster's geo-transform works in a projected CRS (UTM for the imagery
//! this pipeline was built for). This module bridges the two, picking the
//! UTM zone from the coordinate itself the way `utm`-style libraries do.

/// Pick the UTM EPSG code covering a lon/lat coordinate.
///
/// Zones are 6 degrees wide starting at -180; northern-hemisphere zones are
/// `326xx`, southern `327xx`.
#[inline]
#[must_use]
pub fn utm_epsg_for(lon: f64, lat: f64) -> i32 {
    let zone = (((lon + 180.0) / 6.0).floor() as i32 + 1).clamp(1, 60);
    if lat >= 0.0 {
        32600 + zone
    } else {
        32700 + zone
    }
}

/// Project a lon/lat (EPSG:4326) coordinate into its UTM zone.
///
/// Returns `(easting, northing, epsg)` so callers can verify all points of
/// one dataset landed in the same zone.
///
/// # Errors
/// Returns an error if the zone's EPSG code is missing from the
/// crs-definitions database or the transform fails.
pub fn lat_lon_to_utm(lon: f64, lat: f64) -> Result<(f64, f64, i32), String> {
    let epsg = utm_epsg_for(lon, lat);
    let (x, y) = project_point(4326, epsg, lon, lat)?;
    Ok((x, y, epsg))
}

/// Project a point from one CRS to another.
///
/// # Errors
/// Returns an error if either EPSG code is not in the crs-definitions
/// database or the projection transformation fails.
pub fn project_point(
    source_epsg: i32,
    target_epsg: i32,
    x: f64,
    y: f64,
) -> Result<(f64, f64), String> {
    use proj4rs::proj::Proj;
    use proj4rs::transform::transform;

    if source_epsg == target_epsg {
        return Ok((x, y));
    }

    let source_str = get_proj_string(source_epsg)
        .ok_or_else(|| format!("EPSG:{source_epsg} is not in the crs-definitions database"))?;
    let target_str = get_proj_string(target_epsg)
        .ok_or_else(|| format!("EPSG:{target_epsg} is not in the crs-definitions database"))?;

    let source_proj = Proj::from_proj_string(source_str)
        .map_err(|e| format!("Invalid source projection EPSG:{source_epsg}: {e:?}"))?;
    let target_proj = Proj::from_proj_string(target_str)
        .map_err(|e| format!("Invalid target projection EPSG:{target_epsg}: {e:?}"))?;

    // proj4rs works in radians for geographic coordinates
    let (x_in, y_in) = if is_geographic_crs(source_epsg) {
        (x.to_radians(), y.to_radians())
    } else {
        (x, y)
    };

    let mut point = (x_in, y_in, 0.0);
    transform(&source_proj, &target_proj, &mut point)
        .map_err(|e| format!("Transform from EPSG:{source_epsg} to EPSG:{target_epsg} failed: {e:?}"))?;

    let (out_x, out_y) = if is_geographic_crs(target_epsg) {
        (point.0.to_degrees(), point.1.to_degrees())
    } else {
        (point.0, point.1)
    };

    Ok((out_x, out_y))
}

/// Get the PROJ4 string for an EPSG code from the crs-definitions database.
#[inline]
pub fn get_proj_string(epsg: i32) -> Option<&'static str> {
    u16::try_from(epsg)
        .ok()
        .and_then(crs_definitions::from_code)
        .map(|def| def.proj4)
}

/// Check whether an EPSG code represents a geographic (lon/lat) CRS.
#[inline]
#[must_use]
pub fn is_geographic_crs(epsg: i32) -> bool {
    if let Some(proj_str) = get_proj_string(epsg) {
        proj_str.contains("+proj=longlat")
    } else {
        epsg == 4326 || (4000..5000).contains(&epsg)
    }
}
