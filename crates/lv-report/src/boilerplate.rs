//! Fixed document boilerplate.

/// Written once when a document is created, truncating the file.
pub const HTML_BEGIN_BOILERPLATE: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <meta charset="UTF-8">
        <title>Local Visualizer</title>
        <style>
            body {
                -webkit-font-smoothing: antialiased;
                -webkit-text-size-adjust: none;
                margin: 50px !important;
                font-size: 20px;
                font-family: Helvetica, sans-serif;
                font-weight: 100;
            }
            table.dataframe {
                border-collapse: collapse;
                border: none;
            }
            table.dataframe tr {
                border: none;
            }
            table.dataframe td, table.dataframe th {
                margin: 2px;
                border: 1px solid white;
                padding-left: 0.25em;
                padding-right: 0.25em;
            }
            table.dataframe th:not(:empty) {
                background-color: #fec;
                text-align: left;
                font-weight: 100;
            }
            table.dataframe tr:nth-child(2) th:empty {
                border-left: none;
                border-right: 1px dashed #888;
            }
            table.dataframe td {
                border: 2px solid #ccf;
                background-color: #f4f4ff;
            }
        </style>
    </head>
    <body>
"#;

/// Closing fragment appended by an explicit close.
pub const HTML_END_BOILERPLATE: &str = "    </body>\n</html>";
