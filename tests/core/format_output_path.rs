//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use report_localizer::core::format_output_path;

    #[test]
    fn default_template() {
        let file_name = format_output_path("%language%_report.html", "French");

        assert_eq!(file_name, "french_report.html");
    }

    #[test]
    fn as_is() {
        let file_name = format_output_path("report.html", "French");

        assert_eq!(file_name, "report.html");
    }

    #[test]
    fn substitute_language_multi() {
        let file_name = format_output_path("%language%/%language%_report.html", "Swedish");

        assert_eq!(file_name, "swedish/swedish_report.html");
    }

    #[test]
    fn spaces_in_language() {
        let file_name = format_output_path("%language%.html", "Brazilian Portuguese");

        assert_eq!(file_name, "brazilian_portuguese.html");
    }

    #[test]
    fn sanitize() {
        let file_name = format_output_path("%language%.html", r#"Chi<>:"|?*nese"#);

        assert_eq!(file_name, "chinese.html");
    }

    #[test]
    fn level_up() {
        let file_name = format_output_path("%language%.html", "../French");

        assert_eq!(file_name, "_french.html");
    }

    #[test]
    fn timestamp() {
        let file_name = format_output_path("%language%_%timestamp%.html", "French");

        assert!(file_name.starts_with("french_"));
        assert!(file_name.ends_with("Z.html"));
        assert!(!file_name.contains(':'));
    }
}
