//! コマンドラインツール共通のログ設定

use std::io::IsTerminal;
use tracing::Level;

/// 標準エラー出力にログを出す`fmt`サブスクライバを登録します
///
/// 環境変数は参照せず、出力レベルは呼び出し元（CLIの引数）が決めます。
pub fn init(level: Level) {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .init();
}

/// `--verbose`/`--quiet`フラグからログレベルを決めます
pub fn level_from_flags(verbose: bool, quiet: bool) -> Level {
    match (verbose, quiet) {
        (true, _) => Level::DEBUG,
        (false, true) => Level::WARN,
        (false, false) => Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_flags() {
        assert_eq!(level_from_flags(false, false), Level::INFO);
        assert_eq!(level_from_flags(true, false), Level::DEBUG);
        assert_eq!(level_from_flags(false, true), Level::WARN);
        assert_eq!(level_from_flags(true, true), Level::DEBUG);
    }
}
