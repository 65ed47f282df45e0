//! Storage paths, file names and the image proxy URLs that point at them.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Root folder for collaborator files.
pub const BASE_PATH: &str = "colaboradores";

const PROXY_ROUTE: &str = "/api/nextcloud/image";
const WEBDAV_MARKER: &str = "/remote.php/dav/files/";

// Latin letters with a stroke have no canonical decomposition.
fn sem_traco(c: char) -> char {
    match c {
        'ø' => 'o',
        'Ø' => 'O',
        'ł' => 'l',
        'Ł' => 'L',
        'đ' => 'd',
        'Đ' => 'D',
        _ => c,
    }
}

/// Folds accents, replaces anything outside `[A-Za-z0-9_-]` with `_` and
/// lowercases.
pub fn sanitize_file_name(nome: &str) -> String {
    nome.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(sem_traco)
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

pub fn caminho_colaborador(colaborador_id: &str) -> String {
    format!("{BASE_PATH}/{colaborador_id}")
}

pub fn caminho_avatar(colaborador_id: &str, arquivo: &str) -> String {
    format!("{}/avatar_{arquivo}", caminho_colaborador(colaborador_id))
}

/// File name for an uploaded image: `{millis}.{ext}`, taking the extension
/// from the original name (`jpg` when it has none).
pub fn nome_arquivo(millis: i64, nome_original: &str) -> String {
    let ext = nome_original
        .rsplit_once('.')
        .map(|(_, ext)| sanitize_file_name(ext))
        .filter(|ext| !ext.is_empty())
        .unwrap_or_else(|| "jpg".to_string());
    format!("{millis}.{ext}")
}

/// URL of the application's image proxy for a storage path.
pub fn url_proxy(app_url: &str, caminho: &str) -> String {
    format!(
        "{}{PROXY_ROUTE}?path={}",
        app_url.trim_end_matches('/'),
        urlencoding::encode(caminho)
    )
}

/// Makes a stored image URL reachable from outside the WebDAV server.
///
/// Proxy URLs come back unchanged. Direct WebDAV URLs
/// (`.../remote.php/dav/files/<user>/<path>`) become proxy URLs for `<path>`.
/// Anything else is returned as is.
pub fn url_acessivel(app_url: &str, url: Option<&str>) -> Option<String> {
    let url = url.filter(|u| !u.is_empty())?;
    if url.contains(PROXY_ROUTE) {
        return Some(url.to_string());
    }

    let caminho = url
        .find(WEBDAV_MARKER)
        .map(|i| &url[i + WEBDAV_MARKER.len()..])
        .and_then(|resto| resto.split_once('/'))
        .filter(|(usuario, caminho)| !usuario.is_empty() && !caminho.is_empty())
        .map(|(_, caminho)| caminho);

    Some(match caminho {
        Some(c) => url_proxy(app_url, c),
        None => url.to_string(),
    })
}

/// MIME type of a known image extension.
pub fn mime_imagem(nome: &str) -> Option<&'static str> {
    let ext = nome.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Content type served for a stored image; unknown extensions are served as JPEG.
pub fn content_type(caminho: &str) -> &'static str {
    mime_imagem(caminho).unwrap_or("image/jpeg")
}
