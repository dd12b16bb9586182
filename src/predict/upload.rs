const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Extension whitelist on the client-supplied filename. The decoded bytes are
/// validated separately when the image is opened.
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Strips path traversal sequences and anything outside a conservative
/// character whitelist, so the result is safe to join onto the upload dir.
pub fn sanitize_filename(filename: &str) -> String {
    let cleaned = filename
        .replace("..", "")
        .replace(['/', '\\', '\0'], "");

    let sanitized: String = cleaned
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .take(255)
        .collect();

    if sanitized.is_empty() {
        "upload".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_three_image_extensions() {
        assert!(allowed_file("leaf.png"));
        assert!(allowed_file("leaf.jpg"));
        assert!(allowed_file("leaf.JPEG"));
    }

    #[test]
    fn rejects_other_extensions_and_missing_dot() {
        assert!(!allowed_file("leaf.gif"));
        assert!(!allowed_file("leaf.webp"));
        assert!(!allowed_file("leaf"));
        assert!(!allowed_file("leaf.png.exe"));
    }

    #[test]
    fn sanitize_strips_traversal() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_filename("..\\..\\boot.ini"), "boot.ini");
    }

    #[test]
    fn sanitize_keeps_plain_names() {
        assert_eq!(sanitize_filename("tomato_leaf-01.jpg"), "tomato_leaf-01.jpg");
    }

    #[test]
    fn sanitize_never_returns_empty() {
        assert_eq!(sanitize_filename("///"), "upload");
    }
}
