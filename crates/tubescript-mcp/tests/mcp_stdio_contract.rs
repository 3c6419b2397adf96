#[cfg(feature = "stdio")]
#[test]
fn tubescript_stdio_lists_and_calls_tool() {
    // True end-to-end check (spawns a child process); skipped by default.
    if std::env::var("TUBESCRIPT_E2E").ok().as_deref() != Some("1") {
        eprintln!("skipping: set TUBESCRIPT_E2E=1 to run this test");
        return;
    }

    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
    rt.block_on(async {
        use rmcp::model::CallToolRequestParam;
        use rmcp::{
            service::ServiceExt,
            transport::{ConfigureCommandExt, TokioChildProcess},
        };

        let dir = tempfile::tempdir()?;
        let bin = assert_cmd::cargo::cargo_bin!("tubescript");
        let service = ()
            .serve(TokioChildProcess::new(
                tokio::process::Command::new(bin).configure(|cmd| {
                    cmd.args(["mcp-stdio"]);
                    cmd.current_dir(dir.path());
                    cmd.env("YOUTUBE_API_KEY", "test-key");
                    cmd.env("RUST_LOG", "error");
                }),
            )?)
            .await?;

        let tools = service.list_tools(Default::default()).await?;
        assert_eq!(tools.tools.len(), 1);
        let tool = &tools.tools[0];
        assert_eq!(tool.name, "get_youtube_video_transcript");
        let schema = serde_json::Value::Object((*tool.input_schema).clone());
        assert!(schema["required"]
            .as_array()
            .unwrap_or(&vec![])
            .iter()
            .any(|x| x == "url"));

        let text_of = |r: rmcp::model::CallToolResult| -> String {
            r.content
                .first()
                .and_then(|c| c.as_text())
                .map(|t| t.text.clone())
                .unwrap_or_default()
        };

        // Invalid URL: an ordinary response carrying an error object.
        let resp = service
            .call_tool(CallToolRequestParam {
                name: "get_youtube_video_transcript".into(),
                arguments: Some(
                    serde_json::json!({ "url": "not a url" })
                        .as_object()
                        .cloned()
                        .unwrap(),
                ),
            })
            .await?;
        let v: serde_json::Value = serde_json::from_str(&text_of(resp))?;
        assert_eq!(
            v["error"].as_str(),
            Some("Invalid YouTube URL: No valid YouTube video ID found in URL")
        );

        // Missing url: plain text, not a LookupResult.
        let resp = service
            .call_tool(CallToolRequestParam {
                name: "get_youtube_video_transcript".into(),
                arguments: Some(serde_json::Map::new()),
            })
            .await?;
        assert_eq!(text_of(resp), "Error: URL parameter is required");

        service.cancel().await?;
        Ok::<(), Box<dyn std::error::Error>>(())
    })
    .expect("mcp stdio contract");
}
