use crate::domain::hormone::entities::HormoneReading;

pub const SYSTEM_PROMPT: &str = "You are a medical AI assistant specializing in hormone analysis. \
Provide professional, accurate, and helpful insights based on hormone test results. \
Always include disclaimers about consulting healthcare professionals.";

const RESPONSE_FORMAT: &str = r#"{
  "overallScore": number,
  "riskLevel": "low|moderate|high|critical",
  "summary": "string",
  "insights": [
    {
      "type": "positive|warning|suggestion|lifestyle|medical",
      "title": "string",
      "description": "string",
      "severity": "low|medium|high|critical",
      "category": "hormone_balance|lifestyle|nutrition|exercise|medical_attention",
      "recommendations": [
        {
          "action": "string",
          "priority": "low|medium|high",
          "timeframe": "string"
        }
      ]
    }
  ],
  "confidence": number (0-1)
}"#;

pub fn build_analysis_prompt(extracted_text: &str, readings: &[HormoneReading]) -> String {
    let readings_json =
        serde_json::to_string_pretty(readings).unwrap_or_else(|_| "[]".to_string());

    format!(
        "Please analyze the following hormone test results and provide insights:

Extracted Text from Medical Report:
{extracted_text}

Parsed Hormone Data:
{readings_json}

Please provide:
1. Overall health score (0-100)
2. Risk level (low/moderate/high/critical)
3. Summary of findings
4. Specific insights and recommendations
5. Lifestyle suggestions

Format your response as JSON with the following structure:
{RESPONSE_FORMAT}

IMPORTANT: Always include a disclaimer that this is for informational purposes only and users should consult healthcare professionals."
    )
}
