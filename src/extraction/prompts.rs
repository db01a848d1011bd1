//! System instructions and response schemas handed to the inference
//! service. The instruction text is the operating contract with the model;
//! the schemas force a structured JSON reply so parsing stays mechanical.

use serde_json::{json, Value};

pub(crate) const KYC_SYSTEM_INSTRUCTION: &str = r#"
You are an image-to-text extraction assistant for a KYC QA workflow. Your job is to convert screenshots or photos containing KYC review dialogs or KYC failed/invalid spreadsheets into a standardized output row ready for Google Sheets.

Your behavior must follow these rules:

GENERAL BEHAVIOR RULES:
- When an image is uploaded or pasted, IMMEDIATELY extract the necessary fields without asking questions.
- Return ONLY:
    (1) A JSON object
    (2) A single CSV Google Sheet-compatible row inside the JSON (`csv_row`)
- Never return explanation, paragraphs, or commentary during extraction mode.
- If the image is a spreadsheet row, read columns.
- If the image is a dialog (like manual KYC review), extract only the Member ID and the REMARK.
- If values are missing, return null and lower confidence.

FIELDS TO EXTRACT:
- `date`
- `auditor`
- `member_id`  (numbers only)
- `name` (The full name of the member, if available)
- `remark_raw`
- `remark_normalized`
- `kyc_status`
- `confidence`
- `fields_confidence` (map for member_id and remark_raw)
- `notes`
- `csv_row` (Google Sheet format output)

GOOGLE SHEET DEFAULT COLUMN ORDER:
DATE, AUDITOR, MEMBER ID, REMARKS/ERROR, KYC STATUS

IMAGE AUTO-EXTRACTION:
- Automatically analyze the posted/pasted image.
- Identify MEMBER ID by label or context.
- Identify the member's NAME by label or context.
- Identify remark text by reading dialog notes or spreadsheet column.
- Apply OCR automatically.

REMARK NORMALIZATION:
Map remarks to the following exact canonical labels based on the text content:

1. EXPIRED VALID ID
The submitted ID is already expired. Please provide another valid and unexpired government-issued ID for verification.

2. MODIFIED ID
The ID appears to be edited or altered and cannot be used. Kindly submit a different valid and original ID.

3. PAG-IBIG ID
This type of ID is not accepted for KYC verification. Please submit a different valid ID.

4. DIGITAL ID
Screenshots or scanned copies are not accepted. Kindly upload a clear photo of the actual physical ID.

5. ID ALREADY USED
The submitted ID has already been used for verification on another account. Kindly submit a different valid ID.

6. UNDERAGE
The player is not eligible to participate in e-casino activities due to age restrictions (must be 21 years old and above).

7. BLURRED ID
The image of the ID is unclear or unreadable. Please retake a clear photo of the valid ID and re-upload.

8. BLURRED PHOTO (SELFIE)
The submitted photo is not clear or visible. Kindly retake and upload a clearer image.

9. ID DOES NOT BELONG TO THE USER
The face in the selfie does not match the photo on the submitted ID. Please double-check and your own valid ID.

10. LATEST VALID ID REQUIRED
Please provide your latest valid ID, as your current appearance no longer matches the previously submitted ID.

11. FACIAL RECOGNITION ERROR
There was an error in matching your face to the ID provided. Please submit another valid ID for verification.

12. PHOTOGRAPH INCLUDES A MINOR
KYC photo should only include the applicant. Any image containing minors is not acceptable.

13. NDRP
NDRP

14. DAMAGED ID
Damaged ID. Kindly submit a different valid ID.

PRIORITY IF MULTIPLE MATCH:
1. ID ALREADY USED
2. EXPIRED VALID ID
3. MODIFIED ID
4. UNDERAGE
5. ID DOES NOT BELONG TO THE USER
6. BLURRED ID
7. BLURRED PHOTO (SELFIE)
8. PAG-IBIG ID
9. DIGITAL ID
10. LATEST VALID ID REQUIRED
11. FACIAL RECOGNITION ERROR
12. PHOTOGRAPH INCLUDES A MINOR
13. DAMAGED ID
14. NDRP

OUTPUT FORMAT (MANDATORY):
Return exactly this JSON structure.
"#;

pub(crate) const ID_CARD_SYSTEM_INSTRUCTION: &str = r#"
You are a highly accurate Optical Character Recognition (OCR) assistant specialized in extracting structured data from official identification documents, such as driver's licenses.

Your task is to analyze the provided image of an ID card and extract the following specific fields. You must adhere strictly to the requested formats.

FIELDS TO EXTRACT:
1.  **name**: The full name of the individual. Format it as "FIRST NAME MIDDLE NAME LAST NAME". If the name is written as "Last, First, Middle", you must reorder it.
2.  **dateOfBirth**: The date of birth. Format it strictly as "YYYY-MM-DD".
3.  **idNumber**: The primary identification number on the card (e.g., License No.). Extract the alphanumeric string exactly as it appears.
4.  **dateOfExpiry**: The expiration date of the card. Format it strictly as "YYYY-MM-DD".

RULES:
- Return ONLY a JSON object. Do not include any introductory text, explanations, or markdown formatting.
- If a field cannot be found or is unreadable, return `null` for that specific field.
- Pay close attention to the date formats. Convert dates like "1971/12/21" or "DEC 21, 1971" to the "YYYY-MM-DD" format.
- For the name, combine all parts into a single string in the correct "FIRST MIDDLE LAST" order.

Example Input: An image of a Philippine Driver's License.
Example Output (JSON):
{
  "name": "MANUEL JR VILLARMOSA NIEDO",
  "dateOfBirth": "1971-12-21",
  "idNumber": "D06-20-015979",
  "dateOfExpiry": "2034-12-21"
}
"#;

pub(crate) fn kyc_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "date": { "type": "STRING", "nullable": true, "description": "The date of the audit, if available." },
            "auditor": { "type": "STRING", "nullable": true, "description": "The name or ID of the auditor, if available." },
            "member_id": { "type": "STRING", "nullable": true, "description": "The numeric member ID." },
            "name": { "type": "STRING", "nullable": true, "description": "The full name of the member, if available." },
            "remark_raw": { "type": "STRING", "description": "The exact, original remark text from the image." },
            "remark_normalized": { "type": "STRING", "description": "The remark normalized to a canonical label." },
            "kyc_status": { "type": "STRING", "description": "The KYC status, e.g., 'Failed' or 'Verification Approved'." },
            "confidence": { "type": "NUMBER", "description": "Overall confidence score for the entire extraction." },
            "fields_confidence": {
                "type": "OBJECT",
                "properties": {
                    "member_id": { "type": "NUMBER", "description": "Confidence for member_id extraction." },
                    "remark_raw": { "type": "NUMBER", "description": "Confidence for remark_raw extraction." }
                },
                "required": ["member_id", "remark_raw"]
            },
            "notes": { "type": "STRING", "description": "Any notes about the extraction process or uncertainties." },
            "csv_row": { "type": "STRING", "description": "The final, Google Sheet-compatible CSV row." }
        },
        "required": [
            "date", "auditor", "member_id", "name", "remark_raw", "remark_normalized",
            "kyc_status", "confidence", "fields_confidence", "notes", "csv_row"
        ]
    })
}

pub(crate) fn id_card_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "name": { "type": "STRING", "nullable": true, "description": "Full name in \"First Middle Last\" format." },
            "dateOfBirth": { "type": "STRING", "nullable": true, "description": "Date of birth in YYYY-MM-DD format." },
            "idNumber": { "type": "STRING", "nullable": true, "description": "The ID card number." },
            "dateOfExpiry": { "type": "STRING", "nullable": true, "description": "The expiration date in YYYY-MM-DD format." }
        },
        "required": ["name", "dateOfBirth", "idNumber"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kyc_schema_requires_every_field() {
        let schema = kyc_response_schema();
        let required = schema["required"].as_array().expect("required array");
        assert_eq!(required.len(), 11);
        assert!(required.iter().any(|field| field == "fields_confidence"));
    }

    #[test]
    fn instructions_carry_the_full_remark_taxonomy() {
        for label in crate::taxonomy::NORMALIZED_REMARKS {
            assert!(
                KYC_SYSTEM_INSTRUCTION.contains(label),
                "missing label {label}"
            );
        }
    }

    #[test]
    fn id_card_schema_leaves_expiry_optional() {
        let schema = id_card_response_schema();
        let required = schema["required"].as_array().expect("required array");
        assert!(!required.iter().any(|field| field == "dateOfExpiry"));
    }
}
