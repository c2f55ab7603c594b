use image::{Rgba, RgbaImage};
use uvtile::atlas::{compose_atlas, pack_images, UvTransform};
use uvtile::io::{load_mesh, save_mesh};
use uvtile::{
    combine_parts, subdivide_mesh_uv, CombineConfig, Mesh, MeshPart, ObjExport, PackerConfig,
    Vertex,
};

fn tiled_quad(tiles: f32) -> Mesh {
    let mut mesh = Mesh::new();
    for (position, uv) in [
        ([0.0, 0.0, 0.0], [0.0, 0.0]),
        ([1.0, 0.0, 0.0], [tiles, 0.0]),
        ([1.0, 0.0, 1.0], [tiles, tiles]),
        ([0.0, 0.0, 1.0], [0.0, tiles]),
    ] {
        mesh.add_vertex(Vertex::new(position, uv).with_normal([0.0, 1.0, 0.0]));
    }
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    mesh
}

#[test]
fn test_obj_file_round_trip_after_subdivision() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("floor.obj");
    let output = dir.path().join("floor_normalized.obj");

    save_mesh(&tiled_quad(3.0), &input).unwrap();
    assert!(dir.path().join("floor.mtl").exists());

    let mesh = load_mesh(&input).unwrap();
    assert_eq!(mesh.triangle_count(), 2);

    let normalized = subdivide_mesh_uv(&mesh, 1.0).unwrap();
    // A 3x3 tile quad becomes at least two triangles per tile.
    assert!(normalized.triangle_count() >= 18);
    save_mesh(&normalized, &output).unwrap();

    let reloaded = load_mesh(&output).unwrap();
    assert_eq!(reloaded.triangle_count(), normalized.triangle_count());
    for uv in &reloaded.uvs {
        assert!((0.0..=1.0).contains(&uv[0]) && (0.0..=1.0).contains(&uv[1]));
    }
}

#[test]
fn test_json_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quad.json");

    let mesh = tiled_quad(2.0);
    save_mesh(&mesh, &path).unwrap();
    assert_eq!(load_mesh(&path).unwrap(), mesh);
}

#[test]
fn test_pack_compose_and_remap() {
    let images = vec![
        RgbaImage::from_pixel(64, 64, Rgba([255, 0, 0, 255])),
        RgbaImage::from_pixel(128, 64, Rgba([0, 255, 0, 255])),
        RgbaImage::from_pixel(64, 128, Rgba([0, 0, 255, 255])),
    ];
    let sizes: Vec<(u32, u32)> = images.iter().map(|i| i.dimensions()).collect();

    let pack = pack_images(&sizes, 512, 2).unwrap();
    let atlas = compose_atlas(&pack, &images).unwrap();

    for (index, image) in images.iter().enumerate() {
        let transform = UvTransform::for_image(&pack, index).unwrap();
        let center = transform.apply([0.5, 0.5]);
        let x = (center[0] * 512.0) as u32;
        let y = (center[1] * 512.0) as u32;
        assert_eq!(atlas.image.get_pixel(x, y), image.get_pixel(0, 0));
    }
}

#[test]
fn test_combine_and_export() {
    let dir = tempfile::tempdir().unwrap();
    let parts = vec![MeshPart::new(tiled_quad(2.0), 0), MeshPart::new(tiled_quad(1.0), 1)];
    let images = vec![
        RgbaImage::from_pixel(32, 32, Rgba([200, 10, 10, 255])),
        RgbaImage::from_pixel(16, 48, Rgba([10, 200, 10, 255])),
    ];
    let config =
        CombineConfig::default().with_packer(PackerConfig::default().with_atlas_size(512));

    let output = combine_parts(&parts, &images, &config).unwrap();
    let export = ObjExport::from_combined(&output, "scene").unwrap();
    export.write_to_dir(dir.path()).unwrap();

    let obj = dir.path().join("scene.obj");
    let atlas = image::open(dir.path().join("scene_atlas.png")).unwrap();
    assert_eq!(atlas.width(), 512);

    let mtl = std::fs::read_to_string(dir.path().join("scene.mtl")).unwrap();
    assert!(mtl.contains("map_Kd scene_atlas.png"));

    let reloaded = load_mesh(&obj).unwrap();
    assert_eq!(reloaded.triangle_count(), output.mesh.triangle_count());
}
