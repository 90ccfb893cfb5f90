const COMMANDS: &[&str] = &[
    "start",
    "flip",
    "set_opacity",
    "capture",
    "capture_sample",
    "stop",
    "get_supported_flash_modes",
    "set_flash_mode",
    "start_record_video",
    "stop_record_video",
    "is_camera_started",
    "check_permissions",
    "request_permissions",
];

fn main() {
    tauri_plugin::Builder::new(COMMANDS)
        .android_path("android")
        .build();
}
