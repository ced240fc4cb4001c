use glam::Mat4;

pub fn format_mat4(name: &str, mat: &Mat4) -> String {
    let mut output = format!("{}:\n", name);

    let axes = [
        ("x_axis", mat.x_axis),
        ("y_axis", mat.y_axis),
        ("z_axis", mat.z_axis),
        ("w_axis", mat.w_axis),
    ];
    for (label, axis) in axes {
        output.push_str(&format!(
            "{label}: [{:8.3},{:8.3},{:8.3},{:8.3}]\n",
            axis.x, axis.y, axis.z, axis.w
        ));
    }

    output
}
